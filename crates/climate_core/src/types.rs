//! Tipos de dados do pipeline de leitura.
//!
//! Uma [`SensorReading`] só existe depois de validada pelo
//! [`Acquirer`](crate::acquirer::Acquirer); valores fora da faixa física
//! do DHT22 nunca chegam a ser construídos como leitura válida.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ──────────────────────────────────────────────
// Faixas físicas aceitas
// ──────────────────────────────────────────────

/// Menor temperatura plausível (°C).
pub const TEMP_MIN_C: f32 = -40.0;
/// Maior temperatura plausível (°C).
pub const TEMP_MAX_C: f32 = 80.0;
/// Umidade relativa mínima (%).
pub const HUM_MIN_PCT: f32 = 0.0;
/// Umidade relativa máxima (%).
pub const HUM_MAX_PCT: f32 = 100.0;

// ──────────────────────────────────────────────
// Leitura
// ──────────────────────────────────────────────

/// Leitura validada de temperatura/umidade.
///
/// Invariantes: `-40.0 ≤ temperature_c ≤ 80.0` e `0.0 ≤ humidity_pct ≤ 100.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Temperatura (°C)
    pub temperature_c: f32,
    /// Umidade relativa (0–100%)
    pub humidity_pct: f32,
}

impl SensorReading {
    /// Temperatura convertida para Fahrenheit.
    pub fn temperature_f(&self) -> f32 {
        self.temperature_c * 9.0 / 5.0 + 32.0
    }
}

// ──────────────────────────────────────────────
// Threshold
// ──────────────────────────────────────────────

/// Limite de alerta (estritamente maior que).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub threshold_c: f32,
}

// ──────────────────────────────────────────────
// Registro de log
// ──────────────────────────────────────────────

/// Uma linha do CSV de histórico.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord {
    /// Segundos inteiros desde o início do loop
    pub elapsed_s: u64,
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

impl LogRecord {
    /// Monta o registro a partir do tempo decorrido (truncado em segundos).
    pub fn new(elapsed: Duration, reading: &SensorReading) -> Self {
        Self {
            elapsed_s: elapsed.as_secs(),
            temperature_c: reading.temperature_c,
            humidity_pct: reading.humidity_pct,
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{:.1},{:.1}",
            self.elapsed_s, self.temperature_c, self.humidity_pct
        )
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
