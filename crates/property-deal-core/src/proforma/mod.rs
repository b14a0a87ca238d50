pub mod assumptions;
pub mod engine;

pub use assumptions::{Assumptions, CleaningPolicy, LtrAssumptions, Regime, StrAssumptions};
pub use engine::{compute_proforma, LineItem, ProformaResult};
