pub mod enumeration;

pub mod object;

pub mod value;
