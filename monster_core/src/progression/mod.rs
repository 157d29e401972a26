//! Progression - experience, level-ups, defeat consequences and capture

mod capture;
mod defeat;
mod experience;

pub use capture::{attempt_capture, attempt_capture_with_rng, capture_cost, catch_chance, CaptureResult};
pub use defeat::{handle_defeat, level_penalty, DefeatOutcome};
pub use experience::{award_experience, check_level_up, experience_reward, gold_reward};
