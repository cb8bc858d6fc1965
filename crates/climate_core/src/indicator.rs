//! Controle do LED indicador.

use crate::device::OutputDevice;
use tracing::debug;

/// Dono do dispositivo de saída; lembra o último estado comandado.
pub struct IndicatorController<O> {
    output: O,
    on: bool,
}

impl<O: OutputDevice> IndicatorController<O> {
    /// Cria o controlador e força o LED para desligado.
    pub fn new(mut output: O) -> Self {
        output.set(false);
        Self { output, on: false }
    }

    /// Liga em alerta, desliga caso contrário.
    pub fn set(&mut self, alert: bool) {
        if alert != self.on {
            debug!("LED {}", if alert { "ON" } else { "OFF" });
        }
        // Reenvia mesmo sem mudança de estado.
        self.output.set(alert);
        self.on = alert;
    }

    /// Fail-safe: sem leitura confiável o LED fica apagado.
    pub fn fail_safe(&mut self) {
        self.set(false);
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
