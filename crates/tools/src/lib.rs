pub mod ascii;
pub mod settings;
