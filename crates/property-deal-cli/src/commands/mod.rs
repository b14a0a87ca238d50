pub mod deal;
pub mod proforma;
pub mod purchase;
