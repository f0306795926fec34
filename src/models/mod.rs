pub mod observation;

pub use observation::DailyObservation;
