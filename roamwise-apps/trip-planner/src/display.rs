//!  Roamwise Trip Planner
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Display
//!
//! Pure projections of the view state: flight tables (terminal and HTML)
//! and the itinerary text block. No logic beyond formatting.

use chrono::NaiveDateTime;
use std::cmp::max;
use std::fmt::Write as _;

use crate::flights_results_parser::{AirportTime, FlightOption, FlightSegment};

const API_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const PLACEHOLDER: &str = "N/A";

/// "{hours}h {minutes}m" from a total number of minutes.
pub fn format_duration(total_minutes: u32) -> String {
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// Hour and minute of an API date-time, en-US 12-hour style ("08:05 AM").
/// Anything that does not parse is shown as-is.
pub fn format_time(time: &str) -> String {
    NaiveDateTime::parse_from_str(time.trim(), API_TIME_FORMAT)
        .map(|dt| dt.format("%I:%M %p").to_string())
        .unwrap_or_else(|_| time.to_string())
}

pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${:.0}", price)
    } else {
        format!("${:.2}", price)
    }
}

/// Where the "Book" action sends the browser for a given booking token.
pub fn booking_url(booking_base_url: &str, booking_token: &str) -> String {
    format!(
        "{}?token={}",
        booking_base_url.trim_end_matches('/'),
        urlencoding::encode(booking_token)
    )
}

/// One table row, projected from the first segment of an option.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRow {
    pub airline: String,
    pub flight_number: String,
    pub departure_id: String,
    pub departure_time: String,
    pub arrival_id: String,
    pub arrival_time: String,
    pub duration: String,
    pub aircraft: String,
    pub price: String,
    pub booking_token: Option<String>,
}

impl FlightRow {
    pub fn from_option(option: &FlightOption) -> Self {
        let empty = FlightSegment::default();
        let seg = option.first_segment().unwrap_or(&empty);
        let airport_id = |a: &Option<AirportTime>| {
            a.as_ref()
                .and_then(|a| a.id.clone())
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };
        let airport_time = |a: &Option<AirportTime>| {
            a.as_ref()
                .and_then(|a| a.time.as_deref())
                .map(format_time)
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };

        Self {
            airline: opt_display(&seg.airline),
            flight_number: opt_display(&seg.flight_number),
            departure_id: airport_id(&seg.departure_airport),
            departure_time: airport_time(&seg.departure_airport),
            arrival_id: airport_id(&seg.arrival_airport),
            arrival_time: airport_time(&seg.arrival_airport),
            duration: option
                .total_duration_minutes
                .map(format_duration)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            aircraft: opt_display(&seg.aircraft),
            price: option
                .price
                .map(format_price)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            booking_token: option.booking_token.clone(),
        }
    }
}

fn opt_display(opt: &Option<String>) -> String {
    opt.as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Fixed-width terminal table with booking links listed underneath.
/// `None` when there is nothing to show.
pub fn render_flight_table(
    flights: &[FlightOption],
    booking_base_url: &str,
    max_width: usize,
) -> Option<String> {
    if flights.is_empty() {
        return None;
    }
    let rows: Vec<FlightRow> = flights.iter().map(FlightRow::from_option).collect();

    let cell_flight = |r: &FlightRow| format!("{} {}", r.airline, r.flight_number);
    let cell_dep = |r: &FlightRow| format!("{} {}", r.departure_id, r.departure_time);
    let cell_arr = |r: &FlightRow| format!("{} {}", r.arrival_id, r.arrival_time);

    let mut w_flight = "FLIGHT".len();
    let mut w_dep = "DEPARTURE".len();
    let mut w_arr = "ARRIVAL".len();
    let mut w_dur = "DURATION".len();
    let mut w_aircraft = "AIRCRAFT".len();
    for r in &rows {
        w_flight = max(w_flight, cell_flight(r).chars().count());
        w_dep = max(w_dep, cell_dep(r).chars().count());
        w_arr = max(w_arr, cell_arr(r).chars().count());
        w_dur = max(w_dur, r.duration.chars().count());
        w_aircraft = max(w_aircraft, r.aircraft.chars().count());
    }

    // Aircraft is the least useful column, it absorbs any overflow first
    let fixed = 4 + w_flight + w_dep + w_arr + w_dur + 10 + 2 * 6;
    if fixed + w_aircraft > max_width {
        w_aircraft = max(max_width.saturating_sub(fixed), 8);
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<w1$}  {:<w2$}  {:<w3$}  {:<w4$}  {:<w5$}  PRICE",
        "#",
        "FLIGHT",
        "DEPARTURE",
        "ARRIVAL",
        "DURATION",
        "AIRCRAFT",
        w1 = w_flight,
        w2 = w_dep,
        w3 = w_arr,
        w4 = w_dur,
        w5 = w_aircraft,
    );
    let _ = writeln!(out, "{}", "-".repeat(max_width.min(fixed + w_aircraft)));
    for (i, r) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<w1$}  {:<w2$}  {:<w3$}  {:<w4$}  {:<w5$}  {}",
            i + 1,
            cell_flight(r),
            cell_dep(r),
            cell_arr(r),
            r.duration,
            truncate(&r.aircraft, w_aircraft),
            r.price,
            w1 = w_flight,
            w2 = w_dep,
            w3 = w_arr,
            w4 = w_dur,
            w5 = w_aircraft,
        );
    }

    let links: Vec<String> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            r.booking_token
                .as_deref()
                .map(|t| format!("  [{}] {}", i + 1, booking_url(booking_base_url, t)))
        })
        .collect();
    if !links.is_empty() {
        let _ = writeln!(out, "\nBook:");
        for link in links {
            let _ = writeln!(out, "{}", link);
        }
    }

    Some(out)
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// HTML table whose "Book" anchors open in a new browser context.
/// Empty string when there are no flights.
pub fn render_flight_table_html(flights: &[FlightOption], booking_base_url: &str) -> String {
    if flights.is_empty() {
        return String::new();
    }

    let mut out = String::from(
        "<section class=\"flights\">\n<h2>Available Flights</h2>\n<table>\n<thead><tr>\
         <th>Flight</th><th>Departure</th><th>Arrival</th><th>Duration</th>\
         <th>Aircraft</th><th>Price</th><th>Action</th></tr></thead>\n<tbody>\n",
    );
    for r in flights.iter().map(FlightRow::from_option) {
        let action = match r.booking_token.as_deref() {
            Some(token) => format!(
                "<a class=\"book\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Book</a>",
                escape_html(&booking_url(booking_base_url, token))
            ),
            None => String::new(),
        };
        let _ = writeln!(
            out,
            "<tr><td><strong>{}</strong><br><small>{}</small></td>\
             <td><strong>{}</strong><br><small>{}</small></td>\
             <td><strong>{}</strong><br><small>{}</small></td>\
             <td>{}</td><td>{}</td><td class=\"price\">{}</td><td>{}</td></tr>",
            escape_html(&r.airline),
            escape_html(&r.flight_number),
            escape_html(&r.departure_id),
            escape_html(&r.departure_time),
            escape_html(&r.arrival_id),
            escape_html(&r.arrival_time),
            escape_html(&r.duration),
            escape_html(&r.aircraft),
            escape_html(&r.price),
            action,
        );
    }
    out.push_str("</tbody>\n</table>\n</section>\n");
    out
}

/// Itinerary text is shown verbatim, whitespace preserved.
pub fn render_itinerary_html(itinerary: &str) -> String {
    if itinerary.is_empty() {
        return String::new();
    }
    format!(
        "<section class=\"itinerary\">\n<h2>Your Travel Plan</h2>\n<pre>{}</pre>\n</section>\n",
        escape_html(itinerary)
    )
}
