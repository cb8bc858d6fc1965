//! Loop principal: lê, apresenta, aciona o LED e registra no CSV.
//!
//! Single-thread e cooperativo. O único ponto de suspensão é o [`Clock`]
//! (retry, intervalo de poll, estabilização) e as operações de arquivo.
//! Nenhum erro sai do tick: toda falha vira LED apagado e/ou linha de log
//! não escrita, mais um diagnóstico.

use crate::acquirer::{Acquirer, RetryPolicy};
use crate::config::AppConfig;
use crate::csv_log::CsvLog;
use crate::device::{Clock, OutputDevice, SensorDevice};
use crate::indicator::IndicatorController;
use crate::presenter::present;
use crate::types::{SensorReading, ThresholdConfig};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Parâmetros de temporização do loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopTiming {
    pub poll_interval: Duration,
    pub stabilize_delay: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            stabilize_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Startup,
    Running,
}

/// O que aconteceu com o CSV neste tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    /// Logging desabilitado na configuração
    Disabled,
    /// Sem leitura válida, nada a registrar
    Skipped,
    /// Intervalo mínimo ainda não passou
    NotDue,
    /// Linha escrita (número sequencial)
    Written(u64),
    /// Escrita falhou; tentará de novo no próximo tick elegível
    Failed,
}

/// Resultado de um tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub elapsed: Duration,
    pub reading: Option<SensorReading>,
    pub status_line: Option<String>,
    pub alert: bool,
    pub log: LogOutcome,
}

/// Loop de monitoramento.
pub struct Monitor<S, O, C> {
    acquirer: Acquirer<S>,
    indicator: IndicatorController<O>,
    log: Option<CsvLog>,
    clock: C,
    threshold: ThresholdConfig,
    timing: LoopTiming,
    phase: Phase,
    /// Instante do relógio em que o loop começou (fim do startup).
    origin: Duration,
}

impl<S, O, C> Monitor<S, O, C>
where
    S: SensorDevice,
    O: OutputDevice,
    C: Clock,
{
    pub fn new(
        acquirer: Acquirer<S>,
        indicator: IndicatorController<O>,
        log: Option<CsvLog>,
        clock: C,
        threshold: ThresholdConfig,
        timing: LoopTiming,
    ) -> Self {
        Self {
            acquirer,
            indicator,
            log,
            clock,
            threshold,
            timing,
            phase: Phase::Startup,
            origin: Duration::ZERO,
        }
    }

    /// Monta o loop a partir de uma configuração já validada.
    pub fn from_config(config: &AppConfig, sensor: S, output: O, clock: C) -> Self {
        let log = config
            .logging
            .enabled
            .then(|| CsvLog::new(&config.logging.path, config.log_interval()));

        Self::new(
            Acquirer::new(sensor, config.retry_policy()),
            IndicatorController::new(output),
            log,
            clock,
            config.threshold(),
            LoopTiming {
                poll_interval: config.poll_interval(),
                stabilize_delay: config.stabilize_delay(),
            },
        )
    }

    pub fn acquirer(&self) -> &Acquirer<S> {
        &self.acquirer
    }

    pub fn indicator(&self) -> &IndicatorController<O> {
        &self.indicator
    }

    pub fn log(&self) -> Option<&CsvLog> {
        self.log.as_ref()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.acquirer.policy()
    }

    /// Espera o sensor estabilizar e prepara o CSV.
    ///
    /// Idempotente: chamadas depois da primeira não fazem nada.
    pub fn startup(&mut self) {
        if self.phase == Phase::Running {
            return;
        }

        debug!(
            "Aguardando estabilização do sensor ({:.1}s)",
            self.timing.stabilize_delay.as_secs_f64()
        );
        self.clock.sleep(self.timing.stabilize_delay);

        if let Some(log) = self.log.as_mut() {
            info!("Registrando em {}", log.path().display());
            // Best-effort: `record` tenta o cabeçalho de novo antes de cada escrita.
            if let Err(e) = log.ensure_header() {
                error!("Não foi possível preparar o CSV: {e}");
            }
        }

        // ts_s conta a partir daqui, depois da estabilização.
        self.origin = self.clock.elapsed();

        self.phase = Phase::Running;
    }

    /// Executa um ciclo completo sem dormir o intervalo de poll.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.elapsed();

        let reading = match self.acquirer.acquire(&mut self.clock) {
            Ok(reading) => reading,
            Err(e) => {
                self.indicator.fail_safe();
                warn!("{e} – pulando saída/log neste ciclo");
                debug!("Estatísticas do sensor: {:?}", self.acquirer.stats());
                return TickOutcome {
                    elapsed: now,
                    reading: None,
                    status_line: None,
                    alert: false,
                    log: if self.log.is_some() {
                        LogOutcome::Skipped
                    } else {
                        LogOutcome::Disabled
                    },
                };
            }
        };

        let (line, alert) = present(&reading, &self.threshold);
        info!("{line}");
        self.indicator.set(alert);

        let log = match self.log.as_mut() {
            None => LogOutcome::Disabled,
            Some(log) if !log.should_write(now) => LogOutcome::NotDue,
            Some(log) => match log.record(now, &reading) {
                Ok(entry) => {
                    info!(
                        "OK #{entry}: ts={}s temp={:.1}C hum={:.1}%",
                        now.as_secs(),
                        reading.temperature_c,
                        reading.humidity_pct
                    );
                    LogOutcome::Written(entry)
                }
                Err(e) => {
                    // O LED continua refletindo o sensor.
                    error!("Falha ao gravar CSV: {e}");
                    LogOutcome::Failed
                }
            },
        };

        TickOutcome {
            elapsed: now,
            reading: Some(reading),
            status_line: Some(line),
            alert,
            log,
        }
    }

    /// Tempo decorrido desde o fim do startup.
    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed().saturating_sub(self.origin)
    }

    /// Um tick seguido do intervalo de poll completo.
    ///
    /// Entre a última tentativa de um tick e a primeira do seguinte há
    /// sempre `poll_interval`.
    pub fn step(&mut self) -> TickOutcome {
        let outcome = self.tick();
        self.clock.sleep(self.timing.poll_interval);
        outcome
    }

    /// Loop infinito; só termina com o processo.
    pub fn run(&mut self) -> ! {
        self.startup();
        loop {
            self.step();
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    struct FixedSensor {
        value: Option<(f32, f32)>,
    }

    impl SensorDevice for FixedSensor {
        fn measure(&mut self) -> Result<(), TransportError> {
            match self.value {
                Some(_) => Ok(()),
                None => Err(TransportError("sem resposta".into())),
            }
        }

        fn last_temperature(&self) -> Option<f32> {
            self.value.map(|v| v.0)
        }

        fn last_humidity(&self) -> Option<f32> {
            self.value.map(|v| v.1)
        }
    }

    #[derive(Default)]
    struct Pin(Vec<bool>);

    impl OutputDevice for Pin {
        fn set(&mut self, on: bool) {
            self.0.push(on);
        }
    }

    #[derive(Default)]
    struct ManualClock(Duration);

    impl Clock for ManualClock {
        fn elapsed(&self) -> Duration {
            self.0
        }

        fn sleep(&mut self, duration: Duration) {
            self.0 += duration;
        }
    }

    fn monitor(value: Option<(f32, f32)>) -> Monitor<FixedSensor, Pin, ManualClock> {
        Monitor::new(
            Acquirer::new(FixedSensor { value }, RetryPolicy::default()),
            IndicatorController::new(Pin::default()),
            None,
            ManualClock::default(),
            ThresholdConfig { threshold_c: 25.0 },
            LoopTiming::default(),
        )
    }

    #[test]
    fn startup_waits_stabilization_once() {
        let mut m = monitor(Some((20.0, 40.0)));
        m.startup();
        m.startup();
        assert_eq!(m.clock().elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn tick_without_logging() {
        let mut m = monitor(Some((26.3, 40.2)));
        let out = m.tick();
        assert!(out.alert);
        assert_eq!(out.log, LogOutcome::Disabled);
        assert!(m.indicator().is_on());
    }

    #[test]
    fn step_paces_to_poll_interval() {
        let mut m = monitor(Some((20.0, 40.0)));
        m.step();
        m.step();
        assert_eq!(m.clock().elapsed(), Duration::from_secs(4));
    }

    #[test]
    fn exhausted_tick_still_waits_full_poll_interval() {
        // 3 tentativas com 1s de espera = 2s gastos + 2s de poll.
        let mut m = monitor(None);
        let out = m.step();
        assert!(out.reading.is_none());
        assert_eq!(m.clock().elapsed(), Duration::from_secs(4));

        let second = m.tick();
        assert_eq!(second.elapsed, Duration::from_secs(4));
    }

    #[test]
    fn elapsed_starts_after_stabilization() {
        let mut m = monitor(Some((20.0, 40.0)));
        m.startup();
        assert_eq!(m.clock().elapsed(), Duration::from_secs(2));
        assert_eq!(m.tick().elapsed, Duration::ZERO);
        m.step();
        assert_eq!(m.tick().elapsed, Duration::from_secs(2));
    }
}
