//! # Climate Core
//!
//! Pipeline de monitoramento de temperatura/umidade: leitura com retry,
//! avaliação de threshold, LED indicador e histórico CSV com intervalo
//! mínimo entre escritas. Não depende de hardware; os dispositivos entram
//! pelos traits de [`device`].
//!
//! ## Módulos
//! - [`types`] – Leitura validada, threshold e registro de log
//! - [`error`] – Falhas de transporte, validação, retry e escrita
//! - [`device`] – Traits de sensor, saída digital e relógio
//! - [`acquirer`] – Medição + validação + política de retry
//! - [`presenter`] – Linha de status e flag de alerta
//! - [`indicator`] – Controle do LED (fail-safe)
//! - [`csv_log`] – Cabeçalho, intervalo e append do CSV
//! - [`scheduler`] – Loop principal
//! - [`config`] – Configuração via TOML

pub mod acquirer;
pub mod config;
pub mod csv_log;
pub mod device;
pub mod error;
pub mod indicator;
pub mod presenter;
pub mod scheduler;
pub mod types;

// Re-exports convenientes
pub use acquirer::{Acquirer, RetryPolicy};
pub use config::AppConfig;
pub use csv_log::CsvLog;
pub use device::{Clock, OutputDevice, SensorDevice, SystemClock};
pub use error::{AcquireError, ConfigError, LogError, TransportError};
pub use indicator::IndicatorController;
pub use scheduler::{LogOutcome, Monitor, TickOutcome};
pub use types::{SensorReading, ThresholdConfig};
