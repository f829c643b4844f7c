//! Weather snapshot shown on the diary form.

/// Values read from the form's weather widgets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Weather {
    pub condition: String,
    pub low: String,
    pub high: String,
    pub rainfall: Option<String>,
    pub humidity: Option<String>,
}

impl Weather {
    /// Sentence describing the weather, with a leading space.
    pub fn sentence(&self) -> String {
        format!(
            " 날씨는 {}이고 기온은 {}°C~{}°C입니다.",
            self.condition, self.low, self.high
        )
    }

    /// Insert the weather sentence before the first `.` of `content`, or
    /// append it when there is none.
    pub fn apply_to(&self, content: &str) -> String {
        let sentence = self.sentence();
        match content.find('.') {
            Some(pos) => format!("{}{}{}", &content[..pos], sentence, &content[pos..]),
            None => format!("{}{}", content, sentence),
        }
    }
}

/// Weather sentence or an empty string, for template substitution.
pub(crate) fn weather_info(weather: Option<&Weather>) -> String {
    weather.map(Weather::sentence).unwrap_or_default()
}
