//! Whole-session runs on a virtual clock with a simulated participant.

use qlm_core::{Block, Response};
use qlm_experiment::analysis::summarize;
use qlm_experiment::normalize::FIELDS;
use qlm_experiment::{
    build_timeline, results_to_csv, ExperimentConfig, Runner, SimulatedParticipant,
};
use qlm_timing::{ManualTimer, Timer};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn run_session(seed: u64) -> (Vec<qlm_core::TrialResult>, Vec<(String, String)>, ManualTimer) {
    let config = ExperimentConfig::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let timeline = build_timeline(&config, &mut rng).unwrap();

    let timer = ManualTimer::new();
    let participant = SimulatedParticipant::new(timer.clone(), StdRng::seed_from_u64(seed + 1));
    let sink: Vec<(String, String)> = Vec::new();
    let mut runner = Runner::new(timer.clone(), rng, participant, sink, &config.data_file);
    runner.run(&timeline).unwrap();

    let (history, sink) = runner.into_parts();
    (history, sink, timer)
}

#[test]
fn every_tagged_stage_is_saved_once_in_order() {
    let (history, sink, _) = run_session(21);

    let tagged: Vec<_> = history.iter().filter(|r| r.block.is_some()).collect();
    // 30 observation + 30 production + 1 slider panel
    assert_eq!(tagged.len(), 61);
    assert_eq!(sink.len(), 61);
    assert!(sink.iter().all(|(file, _)| file == "qlm_data.csv"));

    for ((_, line), result) in sink.iter().zip(&tagged) {
        let prefix = format!("{},{},", result.block.unwrap(), result.trial_index);
        assert!(line.starts_with(&prefix), "{line} vs {prefix}");
        assert!(line.ends_with('\n'));
    }

    let indices: Vec<_> = tagged.iter().map(|r| r.trial_index).collect();
    assert!(indices.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn production_selections_match_displayed_choices() {
    let (history, _, _) = run_session(8);

    for (i, result) in history.iter().enumerate() {
        if result.block != Some(Block::Production) {
            continue;
        }
        let Response::Button(index) = result.response else {
            panic!("production stage without a click: {result:?}");
        };
        assert_eq!(result.label_selected.as_ref(), result.choices.get(index));

        // the confirmation stage right after offers only that label
        let confirm = &history[i + 1];
        assert_eq!(confirm.choices, vec![result.label_selected.clone().unwrap()]);
        assert_eq!(confirm.block, None);
    }
}

#[test]
fn observation_lines_have_eight_columns_and_elapsed_time_grows() {
    let (history, sink, timer) = run_session(3);

    for (_, line) in sink.iter().filter(|(_, l)| l.starts_with("observation,")) {
        assert_eq!(line.trim_end().split(',').count(), FIELDS.len());
    }

    let elapsed: Vec<_> = history.iter().map(|r| r.time_elapsed_ms).collect();
    assert!(elapsed.windows(2).all(|w| w[0] <= w[1]));
    // 30 observation trials alone take 30 * 3s of virtual time
    assert!(timer.now_ms() >= 90_000);
}

#[test]
fn summary_and_dump_cover_the_run() {
    let (history, _, _) = run_session(99);
    let summary = summarize(&history);
    assert_eq!(summary.observations, 30);
    let responses: usize = summary.production.values().map(|o| o.responses).sum();
    assert_eq!(responses, 30);
    assert_eq!(summary.slider_values.len(), 3);

    let csv = results_to_csv(&history);
    assert_eq!(csv.lines().count(), history.len() + 1);
}
