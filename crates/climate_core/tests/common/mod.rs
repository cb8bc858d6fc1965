//! Mocks compartilhados pelos testes de integração.

#![allow(dead_code)]

use climate_core::acquirer::{Acquirer, RetryPolicy};
use climate_core::csv_log::CsvLog;
use climate_core::scheduler::{LoopTiming, Monitor};
use climate_core::{Clock, IndicatorController, OutputDevice, SensorDevice, ThresholdConfig, TransportError};
use std::collections::VecDeque;
use std::time::Duration;

// ============================================================================
// Mock Sensor
// ============================================================================

/// Resposta de uma medição.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Fault,
    Values(f32, f32),
    Missing,
}

/// Sensor roteirizado: consome `script` e depois repete `fallback`.
pub struct MockSensor {
    pub script: VecDeque<Reply>,
    pub fallback: Reply,
    pub measure_count: usize,
    temp: Option<f32>,
    hum: Option<f32>,
}

impl MockSensor {
    pub fn constant(temp: f32, hum: f32) -> Self {
        Self::scripted(vec![], Reply::Values(temp, hum))
    }

    pub fn always_failing() -> Self {
        Self::scripted(vec![], Reply::Fault)
    }

    pub fn scripted(script: Vec<Reply>, fallback: Reply) -> Self {
        Self {
            script: script.into(),
            fallback,
            measure_count: 0,
            temp: None,
            hum: None,
        }
    }
}

impl SensorDevice for MockSensor {
    fn measure(&mut self) -> Result<(), TransportError> {
        self.measure_count += 1;
        let reply = self.script.pop_front().unwrap_or(self.fallback);
        match reply {
            Reply::Fault => {
                self.temp = None;
                self.hum = None;
                Err(TransportError("checksum inválido".into()))
            }
            Reply::Missing => {
                self.temp = None;
                self.hum = None;
                Ok(())
            }
            Reply::Values(t, h) => {
                self.temp = Some(t);
                self.hum = Some(h);
                Ok(())
            }
        }
    }

    fn last_temperature(&self) -> Option<f32> {
        self.temp
    }

    fn last_humidity(&self) -> Option<f32> {
        self.hum
    }
}

// ============================================================================
// Mock LED
// ============================================================================

#[derive(Default)]
pub struct MockLed {
    pub writes: Vec<bool>,
}

impl MockLed {
    pub fn is_on(&self) -> bool {
        self.writes.last().copied().unwrap_or(false)
    }
}

impl OutputDevice for MockLed {
    fn set(&mut self, on: bool) {
        self.writes.push(on);
    }
}

// ============================================================================
// Relógio manual
// ============================================================================

/// Relógio simulado: `sleep` apenas avança o tempo.
#[derive(Default)]
pub struct ManualClock {
    pub now: Duration,
    pub sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn starting_at(now: Duration) -> Self {
        Self {
            now,
            sleeps: Vec::new(),
        }
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
        self.sleeps.push(duration);
    }
}

// ============================================================================
// Montagem
// ============================================================================

pub type TestMonitor = Monitor<MockSensor, MockLed, ManualClock>;

pub fn build_monitor(
    sensor: MockSensor,
    clock: ManualClock,
    threshold_c: f32,
    poll_interval: Duration,
    log: Option<CsvLog>,
) -> TestMonitor {
    Monitor::new(
        Acquirer::new(sensor, RetryPolicy::default()),
        IndicatorController::new(MockLed::default()),
        log,
        clock,
        ThresholdConfig { threshold_c },
        LoopTiming {
            poll_interval,
            stabilize_delay: Duration::ZERO,
        },
    )
}
