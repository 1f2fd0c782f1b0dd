pub mod sasl_mechanisms;
pub mod source;
pub mod stream;
