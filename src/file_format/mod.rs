pub mod skos;
