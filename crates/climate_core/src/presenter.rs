//! Avaliação de threshold e formatação da linha de status.

use crate::types::{SensorReading, ThresholdConfig};
use std::fmt;

/// Estado derivado da leitura.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    Ok,
    Alert,
}

impl AlertState {
    pub fn is_alert(self) -> bool {
        self == AlertState::Alert
    }
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertState::Ok => f.write_str("OK"),
            AlertState::Alert => f.write_str("ALERT"),
        }
    }
}

/// Alerta quando a temperatura é estritamente maior que o threshold.
pub fn evaluate(reading: &SensorReading, threshold: &ThresholdConfig) -> AlertState {
    if reading.temperature_c > threshold.threshold_c {
        AlertState::Alert
    } else {
        AlertState::Ok
    }
}

/// Linha de status + flag de alerta.
///
/// Formato fixo (consumido por scripts de log):
/// `Temp: 26.3 C / 79.3 F | Hum: 40.2 % | Threshold: 25.0 C | ALERT`
pub fn present(reading: &SensorReading, threshold: &ThresholdConfig) -> (String, bool) {
    let state = evaluate(reading, threshold);
    let line = format!(
        "Temp: {:.1} C / {:.1} F | Hum: {:.1} % | Threshold: {:.1} C | {}",
        reading.temperature_c,
        reading.temperature_f(),
        reading.humidity_pct,
        threshold.threshold_c,
        state
    );
    (line, state.is_alert())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature_c: f32, humidity_pct: f32) -> SensorReading {
        SensorReading {
            temperature_c,
            humidity_pct,
        }
    }

    const THRESHOLD: ThresholdConfig = ThresholdConfig { threshold_c: 25.0 };

    #[test]
    fn alert_line_matches_format() {
        let (line, alert) = present(&reading(26.3, 40.2), &THRESHOLD);
        assert_eq!(
            line,
            "Temp: 26.3 C / 79.3 F | Hum: 40.2 % | Threshold: 25.0 C | ALERT"
        );
        assert!(alert);
    }

    #[test]
    fn below_threshold_is_ok() {
        let (line, alert) = present(&reading(24.9, 55.0), &THRESHOLD);
        assert!(line.ends_with("| OK"), "{line}");
        assert!(!alert);
    }

    #[test]
    fn equal_to_threshold_is_not_alert() {
        let (line, alert) = present(&reading(25.0, 50.0), &THRESHOLD);
        assert!(line.ends_with("| OK"));
        assert!(!alert);
    }

    #[test]
    fn sweep_around_threshold() {
        for tenth in -400..=800 {
            let t = tenth as f32 / 10.0;
            let (line, alert) = present(&reading(t, 50.0), &THRESHOLD);
            assert_eq!(alert, t > 25.0, "t={t}");
            assert_eq!(line.contains("ALERT"), alert, "t={t}");
            assert_eq!(line.ends_with("| OK"), !alert, "t={t}");
        }
    }

    #[test]
    fn negative_temperatures_render() {
        let (line, _) = present(&reading(-10.0, 80.0), &THRESHOLD);
        assert_eq!(
            line,
            "Temp: -10.0 C / 14.0 F | Hum: 80.0 % | Threshold: 25.0 C | OK"
        );
    }
}
