//! Taxonomia de erros do pipeline.
//!
//! Falhas de transporte e de validação são tratadas pela mesma política de
//! retry; a distinção existe só para o diagnóstico.

use std::path::PathBuf;

/// Falha de comunicação com o sensor numa tentativa.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("falha de comunicação com o sensor: {0}")]
pub struct TransportError(pub String);

/// Leitura recebida mas fisicamente implausível (ou ausente).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationFault {
    #[error("leitura ausente")]
    MissingValue,

    #[error("temperatura fora da faixa: {0} °C (-40–80)")]
    TemperatureOutOfRange(f32),

    #[error("umidade fora da faixa: {0} % (0–100)")]
    HumidityOutOfRange(f32),
}

/// Motivo da falha de uma tentativa individual.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttemptFault {
    #[error("transporte: {0}")]
    Transport(#[from] TransportError),

    #[error("validação: {0}")]
    Validation(#[from] ValidationFault),
}

/// Único erro que o Acquirer expõe ao loop.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AcquireError {
    #[error("todas as {attempts} tentativas de leitura falharam")]
    Exhausted { attempts: u32 },
}

/// Erros do log CSV.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("não foi possível abrir {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("erro de escrita em {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Erros de leitura/gravação do config.toml.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("erro de E/S em {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML inválido em {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("falha ao serializar configuração: {0}")]
    Serialize(#[from] toml::ser::Error),
}
