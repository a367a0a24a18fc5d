use crate::types::PokemonType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Invalid type name: {0:?}")]
    InvalidTypeName(String),

    #[error("Invalid multiplier {value} for {attacking} attacking {defending}")]
    InvalidMultiplier {
        attacking: PokemonType,
        defending: PokemonType,
        value: f64,
    },

    #[error("Type chart has no entry for {attacking} attacking {defending}")]
    IncompleteChart {
        attacking: PokemonType,
        defending: PokemonType,
    },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
