//! Pure formatting of a [`WeatherReport`] as JSON or Markdown.

use std::fmt;

use crate::model::{Location, WeatherReport};

/// Visual style of the Markdown document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    #[default]
    Plain,
    /// Emoji markers on the title, header lines and section headings.
    Decorated,
}

struct Markers {
    title: &'static str,
    location: &'static str,
    date: &'static str,
    timezone: &'static str,
    units: &'static str,
    temperature: &'static str,
    humidity: &'static str,
    pressure: &'static str,
    cloud_cover: &'static str,
    precipitation: &'static str,
    wind: &'static str,
}

const PLAIN: Markers = Markers {
    title: "",
    location: "",
    date: "",
    timezone: "",
    units: "",
    temperature: "",
    humidity: "",
    pressure: "",
    cloud_cover: "",
    precipitation: "",
    wind: "",
};

const DECORATED: Markers = Markers {
    title: "🌤️ ",
    location: "📍 ",
    date: "📅 ",
    timezone: "🕐 ",
    units: "📏 ",
    temperature: "🌡️ ",
    humidity: "💧 ",
    pressure: "🔽 ",
    cloud_cover: "☁️ ",
    precipitation: "🌧️ ",
    wind: "💨 ",
};

impl RenderStyle {
    fn markers(&self) -> &'static Markers {
        match self {
            RenderStyle::Plain => &PLAIN,
            RenderStyle::Decorated => &DECORATED,
        }
    }
}

/// Pretty-printed JSON with a fixed key order. Numbers stay numbers.
pub fn render_json(report: &WeatherReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn render_markdown(report: &WeatherReport, style: RenderStyle) -> String {
    Markdown { report, style }.to_string()
}

/// Markdown view of a report. Sections come in a fixed order and a missing
/// block is left out rather than printed with placeholders.
pub struct Markdown<'a> {
    pub report: &'a WeatherReport,
    pub style: RenderStyle,
}

impl fmt::Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        let m = self.style.markers();

        writeln!(f, "# {}Weather Data", m.title)?;
        writeln!(f)?;
        let Location { latitude, longitude, .. } = &r.location;
        writeln!(f, "{}**Location**: {latitude}, {longitude}", m.location)?;
        writeln!(f, "{}**Date**: {}", m.date, r.date)?;
        writeln!(f, "{}**Timezone**: {}", m.timezone, r.location.timezone)?;
        writeln!(f, "{}**Units**: {}", m.units, r.units)?;

        if let Some(t) = &r.temperature {
            writeln!(f)?;
            writeln!(f, "## {}Temperature", m.temperature)?;
            for (label, reading) in [
                ("Min", &t.min),
                ("Max", &t.max),
                ("Morning", &t.morning),
                ("Afternoon", &t.afternoon),
                ("Evening", &t.evening),
                ("Night", &t.night),
            ] {
                writeln!(f, "- {label}: {}{}", reading.value, reading.unit)?;
            }
        }

        if let Some(h) = &r.humidity {
            writeln!(f)?;
            writeln!(f, "## {}Humidity", m.humidity)?;
            writeln!(f, "- Afternoon: {}{}", h.afternoon, h.unit)?;
        }

        if let Some(p) = &r.pressure {
            writeln!(f)?;
            writeln!(f, "## {}Pressure", m.pressure)?;
            writeln!(f, "- Afternoon: {} {}", p.afternoon, p.unit)?;
        }

        if let Some(c) = &r.cloud_cover {
            writeln!(f)?;
            writeln!(f, "## {}Cloud Cover", m.cloud_cover)?;
            writeln!(f, "- Afternoon: {}{}", c.afternoon, c.unit)?;
        }

        if let Some(p) = &r.precipitation {
            writeln!(f)?;
            writeln!(f, "## {}Precipitation", m.precipitation)?;
            writeln!(f, "- Total: {} {}", p.total, p.unit)?;
        }

        if let Some(w) = &r.wind {
            writeln!(f)?;
            writeln!(f, "## {}Wind", m.wind)?;
            writeln!(f, "- Max Speed: {} {}", w.max.speed, w.max.speed_unit)?;
            writeln!(f, "- Direction: {} {}", w.max.direction, w.max.direction_unit)?;
        }

        Ok(())
    }
}
