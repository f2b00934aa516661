//! Conversion from `forecast.xml` to a weather snapshot.

use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::domain::{Credit, ForecastEntry, Symbol, WeatherSnapshot, Wind};
use crate::source::ConversionError;

use super::types::{Period, WeatherData};

/// yr.no timestamps are local and carry no offset.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn convert_forecast(data: &WeatherData) -> Result<WeatherSnapshot, ConversionError> {
    let forecast = data
        .forecast
        .tabular
        .periods
        .iter()
        .map(convert_period)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WeatherSnapshot {
        city: data.location.name.clone(),
        country: data.location.country.clone(),
        sunrise: parse_time(&data.sun.rise)?,
        sunset: parse_time(&data.sun.set)?,
        forecast,
        credit: Credit {
            text: data.credit.link.text.clone(),
            url: data.credit.link.url.clone(),
        },
        last_update: parse_time(&data.meta.lastupdate)?,
    })
}

fn convert_period(period: &Period) -> Result<ForecastEntry, ConversionError> {
    let celsius: f32 = parse_number("temperature", &period.temperature.value)?;

    Ok(ForecastEntry {
        from: parse_time(&period.from)?,
        to: parse_time(&period.to)?,
        celsius: celsius.round() as i32,
        precipitation_mm: parse_number("precipitation", &period.precipitation.value)?,
        wind: Wind {
            direction: period.wind_direction.code.clone(),
            mps: parse_number("windSpeed", &period.wind_speed.mps)?,
            description: period.wind_speed.name.clone(),
        },
        symbol: Symbol {
            id: parse_number("symbol", &period.symbol.number)?,
            description: period.symbol.name.clone(),
        },
    })
}

fn parse_time(value: &str) -> Result<NaiveDateTime, ConversionError> {
    NaiveDateTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| ConversionError::InvalidTime(value.to_string()))
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, ConversionError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConversionError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::http::parse_xml;

    const FORECAST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<weatherdata>
  <location>
    <name>Vienna</name>
    <type>Capital</type>
    <country>Austria</country>
    <timezone id="Europe/Vienna" utcoffsetMinutes="60" />
    <location altitude="171" latitude="48.20849" longitude="16.37208" geobase="geonames" geobaseid="2761369" />
  </location>
  <credit>
    <link text="Weather forecast from Yr, delivered by the Norwegian Meteorological Institute and NRK" url="https://www.yr.no/place/Austria/Vienna/Vienna/" />
  </credit>
  <links>
    <link id="xmlSource" url="https://www.yr.no/place/Austria/Vienna/Vienna/forecast.xml" />
  </links>
  <meta>
    <lastupdate>2019-03-03T10:37:00</lastupdate>
    <nextupdate>2019-03-03T23:00:00</nextupdate>
  </meta>
  <sun rise="2019-03-03T06:38:29" set="2019-03-03T17:43:52" />
  <forecast>
    <tabular>
      <time from="2019-03-03T12:00:00" to="2019-03-03T18:00:00" period="2">
        <symbol number="4" numberEx="4" name="Cloudy" var="04" />
        <precipitation value="0" />
        <windDirection deg="292.4" code="WNW" name="West-northwest" />
        <windSpeed mps="3.7" name="Gentle breeze" />
        <temperature unit="celsius" value="8" />
        <pressure unit="hPa" value="1015.3" />
      </time>
      <time from="2019-03-03T18:00:00" to="2019-03-04T00:00:00" period="3">
        <symbol number="9" numberEx="9" name="Rain" var="09" />
        <precipitation value="1.9" />
        <windDirection deg="290.1" code="WNW" name="West-northwest" />
        <windSpeed mps="6.3" name="Moderate breeze" />
        <temperature unit="celsius" value="-2" />
        <pressure unit="hPa" value="1012.0" />
      </time>
    </tabular>
  </forecast>
</weatherdata>"#;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIME_FORMAT).unwrap()
    }

    #[test]
    fn converts_location_sun_and_credit() {
        let data: WeatherData = parse_xml(FORECAST).unwrap();
        let weather = convert_forecast(&data).unwrap();

        assert_eq!(weather.city, "Vienna");
        assert_eq!(weather.country, "Austria");
        assert_eq!(weather.sunrise, at("2019-03-03T06:38:29"));
        assert_eq!(weather.sunset, at("2019-03-03T17:43:52"));
        assert_eq!(weather.last_update, at("2019-03-03T10:37:00"));
        assert_eq!(weather.credit.url, "https://www.yr.no/place/Austria/Vienna/Vienna/");
    }

    #[test]
    fn converts_forecast_periods_in_order() {
        let data: WeatherData = parse_xml(FORECAST).unwrap();
        let weather = convert_forecast(&data).unwrap();

        assert_eq!(weather.forecast.len(), 2);
        let first = &weather.forecast[0];
        assert_eq!(first.from, at("2019-03-03T12:00:00"));
        assert_eq!(first.celsius, 8);
        assert_eq!(first.symbol.id, 4);
        assert_eq!(first.symbol.description, "Cloudy");
        assert_eq!(first.wind.direction, "WNW");
        assert_eq!(first.wind.description, "Gentle breeze");
        assert!((first.wind.mps - 3.7).abs() < f32::EPSILON);

        let second = &weather.forecast[1];
        assert_eq!(second.celsius, -2);
        assert!((second.precipitation_mm - 1.9).abs() < f32::EPSILON);
    }

    #[test]
    fn bad_temperature_names_field() {
        let data: WeatherData =
            parse_xml(&FORECAST.replace(r#"value="8""#, r#"value="warm""#)).unwrap();

        let err = convert_forecast(&data).unwrap_err();
        assert_eq!(
            err,
            ConversionError::InvalidNumber {
                field: "temperature",
                value: "warm".into()
            }
        );
    }

    #[test]
    fn bad_timestamp_is_invalid_time() {
        let data: WeatherData =
            parse_xml(&FORECAST.replace("2019-03-03T06:38:29", "sunrise")).unwrap();

        assert_eq!(
            convert_forecast(&data).unwrap_err(),
            ConversionError::InvalidTime("sunrise".into())
        );
    }
}
