pub mod context;
pub mod stamp_duty;
