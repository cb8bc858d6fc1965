//! Configuração unificada via TOML.
//!
//! Lida uma vez no startup; imutável depois disso.

use crate::acquirer::RetryPolicy;
use crate::error::ConfigError;
use crate::types::ThresholdConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Origens de sensor suportadas pelo binário.
pub const SENSOR_SOURCES: &[&str] = &["simulated", "iio"];

/// Configuração do sensor e da política de retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Origem: "simulated" ou "iio"
    pub source: String,
    /// Diretório IIO do DHT22 (driver `dht11` do kernel)
    pub iio_device: String,
    /// Tempo de estabilização após o boot (segundos)
    pub stabilize_secs: f64,
    /// Tentativas por tick
    pub max_attempts: u32,
    /// Espera entre tentativas (segundos)
    pub retry_delay_secs: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            source: "simulated".into(),
            iio_device: "/sys/bus/iio/devices/iio:device0".into(),
            stabilize_secs: 2.0,
            max_attempts: 3,
            retry_delay_secs: 1.0,
        }
    }
}

/// Parâmetros do loop principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Alerta quando temperatura > threshold (°C)
    pub threshold_c: f32,
    /// Intervalo entre leituras (segundos)
    pub poll_interval_secs: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold_c: 25.0,
            poll_interval_secs: 2.0,
        }
    }
}

/// LED indicador.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Arquivo `brightness` do LED em sysfs (vazio = console)
    pub led_path: String,
}

/// Histórico CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub path: String,
    /// Intervalo mínimo entre linhas (segundos)
    pub interval_secs: f64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "dht_log.csv".into(),
            interval_secs: 30.0,
        }
    }
}

/// Configuração raiz.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sensor: SensorConfig,
    pub monitor: MonitorConfig,
    pub indicator: IndicatorConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Lê e interpreta o arquivo, sem fallback.
    pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Carrega o config.toml; arquivo ausente ou inválido cai nos padrões.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("{} não encontrado, usando configuração padrão", path.display());
            return AppConfig::default();
        }

        match Self::read_from(path) {
            Ok(config) => {
                info!("Configuração carregada de {}", path.display());
                config
            }
            Err(e) => {
                warn!("{e}; usando configuração padrão");
                AppConfig::default()
            }
        }
    }

    /// Grava a configuração como TOML legível.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// `config.toml` ao lado do executável (ou no diretório atual).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("config.toml")))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !SENSOR_SOURCES.contains(&self.sensor.source.as_str()) {
            errors.push(format!(
                "Origem de sensor desconhecida: {:?} (use {})",
                self.sensor.source,
                SENSOR_SOURCES.join(" ou ")
            ));
        }
        if self.sensor.max_attempts == 0 {
            errors.push("max_attempts deve ser ≥ 1".into());
        }
        for (name, value) in [
            ("sensor.stabilize_secs", self.sensor.stabilize_secs),
            ("sensor.retry_delay_secs", self.sensor.retry_delay_secs),
            ("monitor.poll_interval_secs", self.monitor.poll_interval_secs),
            ("logging.interval_secs", self.logging.interval_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} inválido: {value} (≥ 0)"));
            }
        }
        if !self.monitor.threshold_c.is_finite() {
            errors.push(format!("threshold_c inválido: {}", self.monitor.threshold_c));
        }
        if self.logging.enabled && self.logging.path.trim().is_empty() {
            errors.push("logging.path vazio com logging habilitado".into());
        }

        errors
    }

    // ── Visões tipadas para o core ──
    // Só chamar depois de `validate()`: durações inválidas viram zero.

    pub fn threshold(&self) -> ThresholdConfig {
        ThresholdConfig {
            threshold_c: self.monitor.threshold_c,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.sensor.max_attempts,
            retry_delay: secs(self.sensor.retry_delay_secs),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        secs(self.monitor.poll_interval_secs)
    }

    pub fn stabilize_delay(&self) -> Duration {
        secs(self.sensor.stabilize_secs)
    }

    pub fn log_interval(&self) -> Duration {
        secs(self.logging.interval_secs)
    }
}

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}
