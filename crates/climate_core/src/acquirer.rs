//! Leitura do sensor com validação e retry.
//!
//! Cada tentativa pode falhar por transporte (o sensor não respondeu) ou por
//! validação (respondeu com lixo). As duas falhas seguem a mesma política:
//! aguarda `retry_delay` e tenta de novo, até `max_attempts`.

use crate::device::{Clock, SensorDevice};
use crate::error::{AcquireError, AttemptFault, ValidationFault};
use crate::types::{HUM_MAX_PCT, HUM_MIN_PCT, SensorReading, TEMP_MAX_C, TEMP_MIN_C};
use std::time::Duration;
use tracing::{debug, warn};

/// Política de retry por tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Contadores acumulados desde o boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquireStats {
    pub attempts: u64,
    pub successes: u64,
    pub transport_faults: u64,
    pub validation_faults: u64,
    pub exhausted: u64,
}

/// Dono do sensor bruto; produz leituras validadas.
pub struct Acquirer<S> {
    sensor: S,
    policy: RetryPolicy,
    stats: AcquireStats,
}

impl<S: SensorDevice> Acquirer<S> {
    pub fn new(sensor: S, policy: RetryPolicy) -> Self {
        Self {
            sensor,
            policy,
            stats: AcquireStats::default(),
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn stats(&self) -> AcquireStats {
        self.stats
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Tenta obter uma leitura válida.
    ///
    /// Retorna na primeira tentativa bem-sucedida. Entre tentativas dorme
    /// `retry_delay` no `clock`; após a última tentativa não há espera.
    pub fn acquire<C: Clock>(&mut self, clock: &mut C) -> Result<SensorReading, AcquireError> {
        let max = self.policy.max_attempts.max(1);

        for attempt in 1..=max {
            self.stats.attempts += 1;

            match self.attempt() {
                Ok(reading) => {
                    self.stats.successes += 1;
                    if attempt > 1 {
                        debug!("Leitura recuperada na tentativa {attempt}/{max}");
                    }
                    return Ok(reading);
                }
                Err(fault) => {
                    match fault {
                        AttemptFault::Transport(_) => self.stats.transport_faults += 1,
                        AttemptFault::Validation(_) => self.stats.validation_faults += 1,
                    }
                    warn!("Leitura do sensor falhou (tentativa {attempt}/{max}): {fault}");

                    if attempt < max {
                        clock.sleep(self.policy.retry_delay);
                    }
                }
            }
        }

        self.stats.exhausted += 1;
        Err(AcquireError::Exhausted { attempts: max })
    }

    /// Uma única medição + validação.
    fn attempt(&mut self) -> Result<SensorReading, AttemptFault> {
        self.sensor.measure()?;
        let reading = validate(self.sensor.last_temperature(), self.sensor.last_humidity())?;
        Ok(reading)
    }
}

/// Valida valores brutos contra a faixa física do DHT22.
///
/// NaN e infinitos caem fora da faixa e são rejeitados.
pub fn validate(
    temperature_c: Option<f32>,
    humidity_pct: Option<f32>,
) -> Result<SensorReading, ValidationFault> {
    let (Some(temperature_c), Some(humidity_pct)) = (temperature_c, humidity_pct) else {
        return Err(ValidationFault::MissingValue);
    };

    if !(HUM_MIN_PCT..=HUM_MAX_PCT).contains(&humidity_pct) {
        return Err(ValidationFault::HumidityOutOfRange(humidity_pct));
    }
    if !(TEMP_MIN_C..=TEMP_MAX_C).contains(&temperature_c) {
        return Err(ValidationFault::TemperatureOutOfRange(temperature_c));
    }

    Ok(SensorReading {
        temperature_c,
        humidity_pct,
    })
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
