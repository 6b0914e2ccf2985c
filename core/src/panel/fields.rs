use crate::format::{self, KILOMETRES, SECONDS};
use crate::model::{EclipseRecord, EclipseType};

/// Illustration shown at the top of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelImage {
    Annular,
    Total,
}

impl PanelImage {
    pub fn for_type(eclipse_type: EclipseType) -> Self {
        match eclipse_type {
            EclipseType::Annular | EclipseType::Hybrid => PanelImage::Annular,
            EclipseType::Total => PanelImage::Total,
        }
    }
}

/// Display strings for every panel field, rendered from one record.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelFields {
    pub image: PanelImage,
    pub type_label: String,
    pub date: String,
    pub time: String,
    pub duration: String,
    pub width: String,
    pub magnitude: String,
    pub sun_position: String,
    pub lunation: String,
    pub saros: String,
    pub gamma: String,
    pub delta_t: String,
}

impl PanelFields {
    pub fn from_record(record: &EclipseRecord) -> Self {
        Self {
            image: PanelImage::for_type(record.eclipse_type),
            type_label: record.eclipse_type.label().to_string(),
            date: format::date(record.date),
            time: format::time(record.greatest_eclipse),
            duration: format::quantity(record.duration_seconds, SECONDS),
            width: format::quantity(record.path_width_km, KILOMETRES),
            magnitude: record.magnitude.to_string(),
            sun_position: format::sun_position(record.sun_altitude, record.sun_azimuth),
            lunation: record.lunation.to_string(),
            saros: record.saros.to_string(),
            gamma: record.gamma.to_string(),
            delta_t: format::quantity(Some(record.delta_t), SECONDS),
        }
    }

    /// Label/value rows in panel order.
    pub fn rows(&self) -> [(PanelField, &str); 10] {
        [
            (PanelField::Date, self.date.as_str()),
            (PanelField::Time, self.time.as_str()),
            (PanelField::Duration, self.duration.as_str()),
            (PanelField::Width, self.width.as_str()),
            (PanelField::Magnitude, self.magnitude.as_str()),
            (PanelField::SunPosition, self.sun_position.as_str()),
            (PanelField::Lunation, self.lunation.as_str()),
            (PanelField::Saros, self.saros.as_str()),
            (PanelField::Gamma, self.gamma.as_str()),
            (PanelField::DeltaT, self.delta_t.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelField {
    Date,
    Time,
    Duration,
    Width,
    Magnitude,
    SunPosition,
    Lunation,
    Saros,
    Gamma,
    DeltaT,
}

impl PanelField {
    pub fn label(self) -> &'static str {
        match self {
            PanelField::Date => "Date",
            PanelField::Time => "Time",
            PanelField::Duration => "Duration",
            PanelField::Width => "Width",
            PanelField::Magnitude => "Magnitude",
            PanelField::SunPosition => "Sun Alt/Azi",
            PanelField::Lunation => "Lunation",
            PanelField::Saros => "Saros Cycle",
            PanelField::Gamma => "Gamma",
            PanelField::DeltaT => "Delta-T",
        }
    }

    /// Tooltip text explaining the field.
    pub fn help(self) -> &'static str {
        match self {
            PanelField::Date => "The date the solar eclipse happened or will happen.",
            PanelField::Time => "The time of day the solar eclipse happened or will happen.",
            PanelField::Duration => "Duration at the point of greatest eclipse.",
            PanelField::Width => "Shadow width on the Earth's surface.",
            PanelField::Magnitude => {
                "The fraction of the sun that is hidden by the Moon's shadow. \
                 A total eclipse will have magnitude of 1 or greater."
            }
            PanelField::SunPosition => "The sun's altitude and azimuth in the sky.",
            PanelField::Lunation => {
                "Lunation is the number for lunar month. They are numbered \
                 sequentially from an arbitrary date."
            }
            PanelField::Saros => {
                "Saros is the number for the main eclipse cycle, called the Saros cycle."
            }
            PanelField::Gamma => {
                "Gamma is the measure of whether the eclipse is centered on the \
                 equator (gamma = 0), the north pole (gamma = 1), or the south pole \
                 (gamma = -1)."
            }
            PanelField::DeltaT => {
                "Delta-T value (in seconds) for the eclipse date. This is a correction \
                 applied because the earth's day is not constant; the earth's rotation \
                 is gradually slowing down because of tidal friction caused by the Moon."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{parse_quantity, parse_sun_position};
    use crate::model::fixtures::record;

    #[test]
    fn fields_render_every_attribute() {
        let fields = PanelFields::from_record(&record(EclipseType::Total, 2024));
        assert_eq!(fields.image, PanelImage::Total);
        assert_eq!(fields.type_label, "Total Eclipse");
        assert_eq!(fields.date, "4/8/2024");
        assert_eq!(fields.time, "6:17:16 PM");
        assert_eq!(fields.duration, "268 seconds");
        assert_eq!(fields.width, "198 km");
        assert_eq!(fields.magnitude, "1.0566");
        assert_eq!(fields.sun_position, "70°/149°");
        assert_eq!(fields.lunation, "294");
        assert_eq!(fields.saros, "139");
        assert_eq!(fields.gamma, "0.3431");
        assert_eq!(fields.delta_t, "74 seconds");
    }

    #[test]
    fn display_strings_read_back_to_record_values() {
        let source = record(EclipseType::Annular, 2023);
        let fields = PanelFields::from_record(&source);
        assert_eq!(parse_quantity(&fields.duration, SECONDS), source.duration_seconds);
        assert_eq!(parse_quantity(&fields.width, KILOMETRES), source.path_width_km);
        assert_eq!(parse_quantity(&fields.delta_t, SECONDS), Some(source.delta_t));
        assert_eq!(
            parse_sun_position(&fields.sun_position),
            Some((source.sun_altitude, source.sun_azimuth))
        );
        assert_eq!(fields.magnitude.parse::<f64>().unwrap(), source.magnitude);
        assert_eq!(fields.gamma.parse::<f64>().unwrap(), source.gamma);
    }

    #[test]
    fn annular_and_hybrid_share_the_annular_image() {
        assert_eq!(PanelImage::for_type(EclipseType::Annular), PanelImage::Annular);
        assert_eq!(PanelImage::for_type(EclipseType::Hybrid), PanelImage::Annular);
        assert_eq!(
            PanelFields::from_record(&record(EclipseType::Hybrid, 2023)).type_label,
            "Hybrid Eclipse"
        );
    }

    #[test]
    fn missing_width_renders_placeholder() {
        let mut source = record(EclipseType::Total, 2024);
        source.path_width_km = None;
        assert_eq!(PanelFields::from_record(&source).width, format::MISSING);
    }
}
