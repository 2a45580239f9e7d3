pub mod column_file;
pub mod columns;
pub mod date;
pub mod generate;
pub mod kernel;
pub mod mask;
pub mod parallel;
pub mod params;
