//! Clothing recommendations derived from threshold rules
//!
//! Each rule looks at one variable. Over a series the rules are first applied
//! to the per-variable maxima, which surfaces the extremes; when that finds
//! at most one condition, the per-variable means get a chance to say more.

use serde::Serialize;

use crate::data::{WeatherDataPoint, WeatherVariable};
use crate::pipeline::averaging::mean;

/// A weather condition worth dressing for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    VeryHot,
    Hot,
    Mild,
    Cold,
    VeryCold,
    HeavyRain,
    ModerateRain,
    LightRain,
    ClearSky,
    HighHumidity,
    DryAir,
    StrongWind,
    ModerateWind,
    /// Nothing else applied
    Normal,
}

impl Condition {
    /// Returns a human-readable display label for the condition.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::VeryHot => "Very hot",
            Condition::Hot => "Hot",
            Condition::Mild => "Pleasant temperature",
            Condition::Cold => "Cold",
            Condition::VeryCold => "Very cold",
            Condition::HeavyRain => "Heavy rain",
            Condition::ModerateRain => "Moderate rain",
            Condition::LightRain => "Light rain",
            Condition::ClearSky => "Clear sky",
            Condition::HighHumidity => "High humidity",
            Condition::DryAir => "Dry air",
            Condition::StrongWind => "Strong wind",
            Condition::ModerateWind => "Moderate wind",
            Condition::Normal => "Normal conditions",
        }
    }

    /// Longer explanation shown under the label
    pub fn advice(&self) -> &'static str {
        match self {
            Condition::VeryHot => {
                "Temperatures are very high. Wear light, breathable clothes, protect yourself from the sun and stay hydrated."
            }
            Condition::Hot => "It is warm. Light, comfortable clothes and something against the sun are a good idea.",
            Condition::Mild => "The weather is pleasant. Dress comfortably without worrying about cold or heat.",
            Condition::Cold => "Temperatures are low. Bring a coat or jacket to stay comfortable.",
            Condition::VeryCold => "Temperatures are very low. Wear several layers and do not forget gloves and a hat.",
            Condition::HeavyRain => "A lot of rain is expected. Waterproofs and suitable shoes are essential.",
            Condition::ModerateRain => "Moderate rain is expected. You will need an umbrella or a raincoat.",
            Condition::LightRain => "Light rain is possible. Keep something at hand to cover yourself.",
            Condition::ClearSky => "Clear skies ahead. Consider sun protection if you will be outdoors.",
            Condition::HighHumidity => "Humidity is high. Breathable clothes will feel more comfortable.",
            Condition::DryAir => "The air is dry. Stay hydrated and consider moisturizer.",
            Condition::StrongWind => "It is very windy. A windbreaker will protect you from the gusts.",
            Condition::ModerateWind => "There is some wind. A light jacket will help.",
            Condition::Normal => "Conditions are normal. Dress comfortably for the season.",
        }
    }

    /// Short clothing suggestion
    pub fn clothing(&self) -> &'static str {
        match self {
            Condition::VeryHot => "Light clothes, sunscreen",
            Condition::Hot => "Light clothes",
            Condition::Mild => "Comfortable mid-season clothes",
            Condition::Cold => "Jacket or coat",
            Condition::VeryCold => "Heavy coat, gloves",
            Condition::HeavyRain => "Raincoat, boots",
            Condition::ModerateRain => "Umbrella, waterproof shoes",
            Condition::LightRain => "Umbrella or light raincoat",
            Condition::ClearSky => "Regular clothes, maybe sunglasses",
            Condition::HighHumidity => "Breathable clothes",
            Condition::DryAir => "Drink water, light clothes",
            Condition::StrongWind => "Windbreaker",
            Condition::ModerateWind => "Light outer layer",
            Condition::Normal => "Comfortable everyday clothes",
        }
    }
}

/// Values the rules are evaluated on; any may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConditionInputs {
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl ConditionInputs {
    /// Reduces each variable of `points` with `reduce`, skipping missing values
    fn from_points(points: &[WeatherDataPoint], reduce: fn(Vec<f64>) -> Option<f64>) -> Self {
        let column = |variable: WeatherVariable| {
            reduce(points.iter().filter_map(|p| p.value(variable)).collect())
        };

        Self {
            temperature: column(WeatherVariable::Temperature),
            precipitation: column(WeatherVariable::Precipitation),
            humidity: column(WeatherVariable::RelativeHumidity),
            wind_speed: column(WeatherVariable::WindSpeed),
        }
    }

    pub fn maxima(points: &[WeatherDataPoint]) -> Self {
        Self::from_points(points, |values| values.into_iter().reduce(f64::max))
    }

    pub fn means(points: &[WeatherDataPoint]) -> Self {
        Self::from_points(points, |values| mean(values))
    }
}

/// Applies the threshold rules in order: temperature, precipitation,
/// humidity, wind.
pub fn conditions_for(inputs: &ConditionInputs) -> Vec<Condition> {
    let mut conditions = Vec::new();

    if let Some(temperature) = inputs.temperature {
        conditions.push(if temperature > 30.0 {
            Condition::VeryHot
        } else if temperature > 25.0 {
            Condition::Hot
        } else if temperature < 5.0 {
            Condition::VeryCold
        } else if temperature < 15.0 {
            Condition::Cold
        } else {
            Condition::Mild
        });
    }

    if let Some(precipitation) = inputs.precipitation {
        if precipitation > 7.0 {
            conditions.push(Condition::HeavyRain);
        } else if precipitation > 2.0 {
            conditions.push(Condition::ModerateRain);
        } else if precipitation > 0.1 {
            conditions.push(Condition::LightRain);
        } else if conditions.is_empty() || conditions == [Condition::Mild] {
            // Clear sky only matters when nothing more pressing was found
            conditions.push(Condition::ClearSky);
        }
    }

    if let Some(humidity) = inputs.humidity {
        if humidity > 80.0 {
            conditions.push(Condition::HighHumidity);
        } else if humidity < 30.0 {
            conditions.push(Condition::DryAir);
        }
    }

    if let Some(wind) = inputs.wind_speed {
        if wind > 30.0 {
            conditions.push(Condition::StrongWind);
        } else if wind > 15.0 {
            conditions.push(Condition::ModerateWind);
        }
    }

    if conditions.is_empty() {
        conditions.push(Condition::Normal);
    }

    conditions
}

/// Recommendations for a series of hourly points
pub fn recommend(points: &[WeatherDataPoint]) -> Vec<Condition> {
    let extremes = conditions_for(&ConditionInputs::maxima(points));
    if extremes.len() > 1 {
        return extremes;
    }

    let typical = conditions_for(&ConditionInputs::means(points));
    if typical.len() > extremes.len() {
        typical
    } else {
        extremes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn point(temp: f64, rain: f64, humidity: f64, wind: f64) -> WeatherDataPoint {
        let time = NaiveDateTime::parse_from_str("2026-03-10T15:00", "%Y-%m-%dT%H:%M").unwrap();
        WeatherDataPoint::new(time)
            .with_value(WeatherVariable::Temperature, temp)
            .with_value(WeatherVariable::Precipitation, rain)
            .with_value(WeatherVariable::RelativeHumidity, humidity)
            .with_value(WeatherVariable::WindSpeed, wind)
    }

    fn inputs(temp: f64) -> ConditionInputs {
        ConditionInputs {
            temperature: Some(temp),
            ..ConditionInputs::default()
        }
    }

    #[test]
    fn test_temperature_thresholds() {
        assert_eq!(conditions_for(&inputs(31.0)), vec![Condition::VeryHot]);
        assert_eq!(conditions_for(&inputs(30.0)), vec![Condition::Hot]);
        assert_eq!(conditions_for(&inputs(25.0)), vec![Condition::Mild]);
        assert_eq!(conditions_for(&inputs(15.0)), vec![Condition::Mild]);
        assert_eq!(conditions_for(&inputs(14.9)), vec![Condition::Cold]);
        assert_eq!(conditions_for(&inputs(4.0)), vec![Condition::VeryCold]);
    }

    #[test]
    fn test_clear_sky_only_with_mild_or_nothing() {
        let mild_dry = ConditionInputs {
            temperature: Some(20.0),
            precipitation: Some(0.0),
            ..ConditionInputs::default()
        };
        assert_eq!(conditions_for(&mild_dry), vec![Condition::Mild, Condition::ClearSky]);

        let cold_dry = ConditionInputs {
            temperature: Some(10.0),
            precipitation: Some(0.0),
            ..ConditionInputs::default()
        };
        assert_eq!(conditions_for(&cold_dry), vec![Condition::Cold]);

        let only_rain = ConditionInputs {
            precipitation: Some(0.05),
            ..ConditionInputs::default()
        };
        assert_eq!(conditions_for(&only_rain), vec![Condition::ClearSky]);
    }

    #[test]
    fn test_rain_humidity_wind_thresholds() {
        let stormy = ConditionInputs {
            temperature: Some(12.0),
            precipitation: Some(8.0),
            humidity: Some(90.0),
            wind_speed: Some(35.0),
        };
        assert_eq!(
            conditions_for(&stormy),
            vec![
                Condition::Cold,
                Condition::HeavyRain,
                Condition::HighHumidity,
                Condition::StrongWind
            ]
        );

        let breezy = ConditionInputs {
            precipitation: Some(3.0),
            humidity: Some(20.0),
            wind_speed: Some(20.0),
            ..ConditionInputs::default()
        };
        assert_eq!(
            conditions_for(&breezy),
            vec![Condition::ModerateRain, Condition::DryAir, Condition::ModerateWind]
        );
    }

    #[test]
    fn test_no_inputs_is_normal() {
        assert_eq!(conditions_for(&ConditionInputs::default()), vec![Condition::Normal]);
        assert_eq!(recommend(&[]), vec![Condition::Normal]);
    }

    #[test]
    fn test_recommend_uses_maxima_for_extremes() {
        let points = vec![point(20.0, 0.0, 50.0, 5.0), point(32.0, 0.0, 50.0, 5.0)];
        // Maxima: very hot, no clear sky (not mild)
        assert_eq!(recommend(&points), vec![Condition::VeryHot]);
    }

    #[test]
    fn test_recommend_prefers_longer_mean_list() {
        // Max temperature is hot (one condition); mean is mild, which adds clear sky
        let points = vec![point(18.0, 0.0, 50.0, 5.0), point(26.0, 0.0, 50.0, 5.0)];
        assert_eq!(recommend(&points), vec![Condition::Mild, Condition::ClearSky]);
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let mut a = point(10.0, 0.0, 50.0, 5.0);
        a.temperature = None;
        let b = point(10.0, 0.0, 50.0, 5.0);

        let maxima = ConditionInputs::maxima(&[a, b]);
        assert_eq!(maxima.temperature, Some(10.0));
    }

    #[test]
    fn test_every_condition_has_text() {
        let all = [
            Condition::VeryHot,
            Condition::Hot,
            Condition::Mild,
            Condition::Cold,
            Condition::VeryCold,
            Condition::HeavyRain,
            Condition::ModerateRain,
            Condition::LightRain,
            Condition::ClearSky,
            Condition::HighHumidity,
            Condition::DryAir,
            Condition::StrongWind,
            Condition::ModerateWind,
            Condition::Normal,
        ];
        for condition in all {
            assert!(!condition.label().is_empty());
            assert!(!condition.advice().is_empty());
            assert!(!condition.clothing().is_empty());
        }
    }
}
