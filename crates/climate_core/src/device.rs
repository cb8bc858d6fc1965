//! Interfaces de hardware e de tempo.
//!
//! O core não conhece pinos nem drivers: recebe objetos que implementam
//! estes traits na construção. Em produção o binário injeta os adaptadores
//! IIO/sysfs; nos testes, mocks em memória.

use crate::error::TransportError;
use std::time::{Duration, Instant};

/// Sensor de temperatura/umidade bruto (DHT22 ou equivalente).
///
/// Protocolo: `measure()` dispara uma conversão; em caso de sucesso os
/// valores ficam disponíveis em `last_temperature()` / `last_humidity()`.
pub trait SensorDevice {
    /// Executa uma medição.
    fn measure(&mut self) -> Result<(), TransportError>;

    /// Última temperatura medida (°C), se houver.
    fn last_temperature(&self) -> Option<f32>;

    /// Última umidade medida (%), se houver.
    fn last_humidity(&self) -> Option<f32>;
}

/// Saída digital (LED indicador).
pub trait OutputDevice {
    fn set(&mut self, on: bool);
}

/// Relógio monotônico relativo ao início do processo.
pub trait Clock {
    /// Tempo decorrido desde a criação do relógio.
    fn elapsed(&self) -> Duration;

    /// Bloqueia o loop pela duração dada.
    fn sleep(&mut self, duration: Duration);
}

/// Relógio real baseado em [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

// O binário escolhe o adaptador em runtime e injeta `Box<dyn ...>`.

impl<T: SensorDevice + ?Sized> SensorDevice for Box<T> {
    fn measure(&mut self) -> Result<(), TransportError> {
        (**self).measure()
    }

    fn last_temperature(&self) -> Option<f32> {
        (**self).last_temperature()
    }

    fn last_humidity(&self) -> Option<f32> {
        (**self).last_humidity()
    }
}

impl<T: OutputDevice + ?Sized> OutputDevice for Box<T> {
    fn set(&mut self, on: bool) {
        (**self).set(on)
    }
}
