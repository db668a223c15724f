pub mod donation_trigger;
pub mod entry_service;
pub mod streak_tracker;
pub mod user_locks;
pub mod word_goal;

pub use donation_trigger::{DonationOutcome, DonationTrigger, SkipReason};
pub use entry_service::{EntryService, EntryUpdate};
pub use streak_tracker::{StreakChange, StreakTracker, StreakUpdate};
pub use user_locks::UserLocks;
pub use word_goal::{WordGoalCalculator, WordGoalInputs};
