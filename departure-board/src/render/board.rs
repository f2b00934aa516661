//! Departure board layout.

use chrono::NaiveDateTime;
use embedded_graphics::mono_font::iso_8859_1::{FONT_6X10, FONT_9X18, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line as Segment, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Baseline, Text};

use crate::domain::{DisplaySnapshot, ForecastEntry, Line, Station, WeatherSnapshot};
use crate::error::FailureKind;

use super::bitmap::Bitmap;
use super::text::{display_countdown, format_addr, format_name, wrap};
use super::{DISPLAY_HEIGHT, DISPLAY_WIDTH, Frame, Renderer};

const TITLE_FONT: &MonoFont<'static> = &FONT_10X20;
const MONO_FONT: &MonoFont<'static> = &FONT_9X18;
const DETAIL_FONT: &MonoFont<'static> = &FONT_6X10;

const WIDTH: i32 = DISPLAY_WIDTH as i32;
const HEIGHT: i32 = DISPLAY_HEIGHT as i32;

const HEADER_HEIGHT: u32 = 43;
const STATIONS_TOP: i32 = 55;
const LINE_OFFSET: i32 = 35;
const LINE_STEP: i32 = 25;
const STATION_STEP: i32 = 45;
const FOOTER_TOP: i32 = 564;

/// Column widths in characters.
const STATION_NAME_WIDTH: usize = 26;
const STATION_NAME_WIDTH_WITH_BIKES: usize = 23;
const DIRECTION_WIDTH: usize = 17;
const TITLE_WIDTH: usize = 29;

/// Countdown columns; only the next two departures are shown.
const COUNTDOWN_X: [i32; 2] = [305, 345];

const WEATHER_COLUMNS: i32 = 2;

/// Draws the board: header, stations, weather footer.
#[derive(Debug, Clone)]
pub struct BoardRenderer {
    title: String,
    avg_waiting_time: u32,
}

impl BoardRenderer {
    /// `avg_waiting_time` widens the window of countdowns worth walking for.
    pub fn new(title: impl Into<String>, avg_waiting_time: u32) -> Self {
        Self {
            title: title.into(),
            avg_waiting_time,
        }
    }

    /// Whether a departure in `minutes` can be caught by leaving now.
    fn is_reachable(&self, walking_time: Option<u32>, minutes: u32) -> bool {
        walking_time.is_some_and(|walk| walk <= minutes && minutes <= walk + self.avg_waiting_time)
    }

    fn draw_header(&self, frame: &mut Frame, title: &str, clock: Option<(String, String)>) {
        fill(&mut frame.highlight, 0, 0, DISPLAY_WIDTH, HEADER_HEIGHT, BinaryColor::On);
        text(
            &mut frame.highlight,
            &format_name(title, TITLE_WIDTH),
            10,
            10,
            TITLE_FONT,
            BinaryColor::Off,
        );

        if let Some((hours, minutes)) = clock {
            text(&mut frame.highlight, &hours, 305, 10, TITLE_FONT, BinaryColor::Off);
            text(&mut frame.highlight, ":", 336, 10, TITLE_FONT, BinaryColor::Off);
            text(&mut frame.highlight, &minutes, 345, 10, TITLE_FONT, BinaryColor::Off);
        }
    }

    /// Draw one station block at `y`; returns where the next one starts.
    fn draw_station(&self, frame: &mut Frame, station: &Station, y: i32, bottom: i32) -> i32 {
        let name_width = match station.bike_share {
            Some(_) => STATION_NAME_WIDTH_WITH_BIKES,
            None => STATION_NAME_WIDTH,
        };
        text(
            &mut frame.highlight,
            &format_addr(&station.name, name_width),
            10,
            y,
            TITLE_FONT,
            BinaryColor::On,
        );

        if let Some(bikes) = &station.bike_share {
            draw_bike_icon(&mut frame.highlight, 307, y + 4);
            text(
                &mut frame.highlight,
                &format!("{:02}", bikes.bike_count),
                345,
                y + 7,
                MONO_FONT,
                BinaryColor::On,
            );
        }

        let mut lines: Vec<&Line> = station.lines.iter().collect();
        lines.sort_by_cached_key(|l| format!("{}{}", l.name, l.direction));

        let mut y = y;
        for line in lines {
            let line_y = y + LINE_OFFSET;
            if line_y + font_height(MONO_FONT) > bottom {
                break;
            }
            self.draw_line(frame, station.walking_time, line, line_y);
            y += LINE_STEP;
        }

        y + STATION_STEP
    }

    fn draw_line(&self, frame: &mut Frame, walking_time: Option<u32>, line: &Line, y: i32) {
        text(&mut frame.black, &line.name, 10, y, MONO_FONT, BinaryColor::On);
        text(
            &mut frame.black,
            &format_addr(&line.direction, DIRECTION_WIDTH),
            60,
            y,
            MONO_FONT,
            BinaryColor::On,
        );

        if line.delayed {
            draw_delay_marker(&mut frame.highlight, 270, y + 3);
        }

        for (&x, &minutes) in COUNTDOWN_X.iter().zip(&line.departures) {
            let layer = if self.is_reachable(walking_time, minutes) {
                &mut frame.highlight
            } else {
                &mut frame.black
            };
            text(layer, &display_countdown(minutes), x, y, MONO_FONT, BinaryColor::On);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, forecast: &[ForecastEntry], night: bool) {
        let target = &mut frame.highlight;
        fill(
            target,
            0,
            FOOTER_TOP,
            DISPLAY_WIDTH,
            (HEIGHT - FOOTER_TOP) as u32,
            BinaryColor::On,
        );

        let column = WIDTH / WEATHER_COLUMNS;
        for (i, entry) in (0..).zip(forecast.iter().take(WEATHER_COLUMNS as usize)) {
            let x = i * column;

            if x + column + 1 < WIDTH {
                fill(
                    target,
                    x + column,
                    FOOTER_TOP + 3,
                    2,
                    (HEIGHT - FOOTER_TOP - 6) as u32,
                    BinaryColor::Off,
                );
            }

            let first_row = FOOTER_TOP + 4;
            let second_row = FOOTER_TOP + 34;
            let third_row = FOOTER_TOP + 58;

            let from = entry.from.format("%H:%M").to_string();
            text(target, &from, 10 + x, first_row, MONO_FONT, BinaryColor::Off);
            let celsius = format!("{:>3}°C", entry.celsius);
            text(target, &celsius, x + column - 74, first_row, MONO_FONT, BinaryColor::Off);

            draw_sun_marker(target, 10 + x, second_row + 2, night);
            let rain = format!("{:.1}mm", entry.precipitation_mm);
            text(target, &rain, 30 + x, second_row, MONO_FONT, BinaryColor::Off);
            let wind = format!("{:>3}km/h", entry.wind.kmh());
            text(target, &wind, x + column - 99, second_row, MONO_FONT, BinaryColor::Off);

            let description = format_name(&entry.symbol.description, 28);
            text(target, &description, 10 + x, third_row, DETAIL_FONT, BinaryColor::Off);
        }
    }
}

impl Renderer for BoardRenderer {
    fn render(&self, snapshot: &DisplaySnapshot, weather: Option<&WeatherSnapshot>) -> Frame {
        let mut frame = Frame::blank();

        let clock = (
            snapshot.last_update.format("%H").to_string(),
            snapshot.last_update.format("%M").to_string(),
        );
        self.draw_header(&mut frame, &self.title, Some(clock));

        let footer = weather.filter(|w| w.forecast.len() >= WEATHER_COLUMNS as usize);
        let bottom = if footer.is_some() { FOOTER_TOP } else { HEIGHT };

        let mut stations: Vec<&Station> = snapshot.stations.iter().collect();
        stations.sort_by(|a, b| a.name.cmp(&b.name));

        let mut y = STATIONS_TOP;
        for station in stations {
            if y + font_height(TITLE_FONT) > bottom {
                break;
            }
            y = self.draw_station(&mut frame, station, y, bottom);
        }

        if let Some(weather) = footer {
            let now: NaiveDateTime = snapshot.last_update.naive_local();
            self.draw_footer(&mut frame, &weather.forecast, weather.is_night(now));
        }

        frame
    }

    fn render_error(&self, message: &str, kind: FailureKind, details: &[String]) -> Frame {
        let mut frame = Frame::blank();
        self.draw_header(&mut frame, kind.as_str(), None);

        let mono_columns = ((WIDTH - 20) / MONO_FONT.character_size.width as i32) as usize;
        let detail_columns = ((WIDTH - 20) / DETAIL_FONT.character_size.width as i32) as usize;

        let mut y = STATIONS_TOP;
        for line in wrap(message, mono_columns) {
            if y + font_height(MONO_FONT) > HEIGHT {
                return frame;
            }
            text(&mut frame.black, &line, 10, y, MONO_FONT, BinaryColor::On);
            y += font_height(MONO_FONT) + 2;
        }

        y += 10;
        for line in details.iter().flat_map(|d| wrap(d, detail_columns)) {
            if y + font_height(DETAIL_FONT) > HEIGHT {
                break;
            }
            text(&mut frame.black, &line, 10, y, DETAIL_FONT, BinaryColor::On);
            y += font_height(DETAIL_FONT) + 2;
        }

        frame
    }
}

fn font_height(font: &MonoFont<'_>) -> i32 {
    font.character_size.height as i32
}

fn text(target: &mut Bitmap, s: &str, x: i32, y: i32, font: &MonoFont<'_>, color: BinaryColor) {
    let style = MonoTextStyle::new(font, color);
    let Ok(_) = Text::with_baseline(s, Point::new(x, y), style, Baseline::Top).draw(target);
}

fn fill(target: &mut Bitmap, x: i32, y: i32, width: u32, height: u32, color: BinaryColor) {
    let Ok(()) = Rectangle::new(Point::new(x, y), Size::new(width, height))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target);
}

/// Warning triangle with a knocked-out `!`, 18×16 px.
fn draw_delay_marker(target: &mut Bitmap, x: i32, y: i32) {
    let Ok(()) = Triangle::new(Point::new(x + 9, y), Point::new(x, y + 16), Point::new(x + 18, y + 16))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target);
    text(target, "!", x + 6, y + 5, DETAIL_FONT, BinaryColor::Off);
}

/// Bicycle outline, 25×20 px.
fn draw_bike_icon(target: &mut Bitmap, x: i32, y: i32) {
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 2);
    let Ok(()) = Circle::new(Point::new(x, y + 9), 10).into_styled(stroke).draw(target);
    let Ok(()) = Circle::new(Point::new(x + 15, y + 9), 10).into_styled(stroke).draw(target);

    let frame = [
        (Point::new(x + 5, y + 14), Point::new(x + 11, y + 5)),
        (Point::new(x + 11, y + 5), Point::new(x + 20, y + 14)),
        (Point::new(x + 5, y + 14), Point::new(x + 14, y + 14)),
        (Point::new(x + 9, y + 2), Point::new(x + 14, y + 2)),
    ];
    for (start, end) in frame {
        let Ok(()) = Segment::new(start, end).into_styled(stroke).draw(target);
    }
}

/// Knocked-out sun (ring) or moon (disc) in the weather footer.
fn draw_sun_marker(target: &mut Bitmap, x: i32, y: i32, night: bool) {
    let style = if night {
        PrimitiveStyle::with_fill(BinaryColor::Off)
    } else {
        PrimitiveStyle::with_stroke(BinaryColor::Off, 2)
    };
    let Ok(()) = Circle::new(Point::new(x, y), 14).into_styled(style).draw(target);
}
