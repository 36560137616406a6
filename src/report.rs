// src/report.rs
use chrono::Utc;
use std::io::{self, Stdout, Write};

use crate::domain::price::AlertSink;
use crate::shared::types::{Alert, AlertKind, Observation};

/// Plain-text status and alert blocks
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AlertSink for ConsoleReporter<W> {
    fn status(&mut self, observation: &Observation) -> io::Result<()> {
        writeln!(self.out, "Current price: {}", observation.price)?;
        writeln!(self.out, "Change (24h): {} %", observation.percent_change)?;
        writeln!(self.out, "Change (24h, abs): {}", observation.absolute_change)?;
        writeln!(self.out, "{}", "*".repeat(20))?;
        self.out.flush()
    }

    fn alert(&mut self, alert: &Alert) -> io::Result<()> {
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S");
        let magnitude = alert.magnitude().normalize();
        writeln!(self.out)?;
        match alert.kind {
            AlertKind::Risen => writeln!(self.out, "[{}] Price has risen by {}% over the period", now, magnitude)?,
            AlertKind::Fallen => writeln!(self.out, "[{}] Price has fallen by {}% over the period", now, magnitude)?,
            AlertKind::Neutral => {
                writeln!(self.out, "[{}] Change over the period: {} %", now, alert.change_percent.normalize())?
            }
        }
        writeln!(self.out, "Current price: {}", alert.price)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
