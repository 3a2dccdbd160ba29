pub mod bitstring;
pub mod canonical;
