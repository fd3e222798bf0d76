use std::ops::RangeInclusive;
use std::time::Duration;

use qlm_core::Response;
use qlm_timing::Timer;
use rand::Rng;

use crate::error::Result;
use crate::runner::{Participant, Screen};
use crate::trial::Input;

/// Answers every screen at random after a random thinking time.
///
/// With a `ManualTimer` the thinking time is virtual, so whole sessions run
/// instantly; with a real timer it paces a pilot run.
pub struct SimulatedParticipant<T: Timer, R: Rng> {
    timer: T,
    rng: R,
    think_ms: RangeInclusive<u64>,
}

impl<T: Timer, R: Rng> SimulatedParticipant<T, R> {
    pub fn new(timer: T, rng: R) -> Self {
        Self {
            timer,
            rng,
            think_ms: 300..=1500,
        }
    }
}

impl<T: Timer, R: Rng> Participant for SimulatedParticipant<T, R> {
    fn respond(&mut self, screen: &Screen<'_>) -> Result<Response> {
        let think = self.rng.random_range(self.think_ms.clone());
        self.timer.sleep(Duration::from_millis(think));

        Ok(match screen.input {
            Input::None => Response::Timeout,
            Input::Buttons(labels) if labels.is_empty() => Response::Timeout,
            Input::Buttons(labels) => Response::Button(self.rng.random_range(0..labels.len())),
            Input::Slider { .. } => Response::Slider(self.rng.random_range(0..=100)),
            Input::SliderPanel(items) => Response::Sliders(
                items
                    .iter()
                    .map(|_| self.rng.random_range(0..=100))
                    .collect(),
            ),
        })
    }
}
