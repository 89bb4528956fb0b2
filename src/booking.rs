//! Rental quote arithmetic for the booking widget.
//!
//! Nothing here is persisted: a "booking" is a pre-filled tel/WhatsApp deep
//! link the visitor sends themselves. There is no availability check and no
//! payment, only a price quote.

use chrono::{Duration, NaiveDate};

/// Flat refundable security deposit, shown as its own line item.
pub const DEPOSIT_INR: f32 = 5000.0;

/// A start/end date pair constrained to a minimum rental length.
///
/// Day counts are inclusive: picking the same date for start and end is a
/// one-day rental before the minimum is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BookingWindow {
    start: NaiveDate,
    end: NaiveDate,
    minimum_days: i64,
}

impl BookingWindow {
    /// Default window: starts `today`, ends `minimum_days` later.
    pub fn new(today: NaiveDate, minimum_days: i64) -> Self {
        let minimum_days = minimum_days.max(1);
        BookingWindow {
            start: today,
            end: today + Duration::days(minimum_days),
            minimum_days,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Moves the start date. The end date is kept unless it would fall under
    /// the minimum-length floor, in which case it is raised to that floor.
    pub fn set_start(&mut self, start: NaiveDate) {
        self.start = start;
        let floor = start + Duration::days(self.minimum_days - 1);
        if self.end < floor {
            self.end = floor;
        }
    }

    /// Moves the end date. An end before the start is clamped to the
    /// minimum-length floor.
    pub fn set_end(&mut self, end: NaiveDate) {
        if end < self.start {
            self.end = self.start + Duration::days(self.minimum_days - 1);
        } else {
            self.end = end;
        }
    }

    /// Inclusive day count, never below `minimum_days`.
    pub fn total_days(&self) -> i64 {
        let days = (self.end - self.start).num_days() + 1;
        days.max(self.minimum_days)
    }
}

/// Line items of a rental quote.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Quote {
    pub total_days: i64,
    pub price_per_day: f32,
    pub rental_cost: f32,
    pub deposit: f32,
    pub grand_total: f32,
}

pub fn quote(window: &BookingWindow, price_per_day: f32) -> Quote {
    let total_days = window.total_days();
    let rental_cost = price_per_day * total_days as f32;
    Quote {
        total_days,
        price_per_day,
        rental_cost,
        deposit: DEPOSIT_INR,
        grand_total: rental_cost + DEPOSIT_INR,
    }
}

/// `https://wa.me/<number>?text=...` with the message URL-encoded.
pub fn whatsapp_link(number: &str, text: &str) -> String {
    format!("https://wa.me/{}?text={}", number, urlencoding::encode(text))
}

pub fn tel_link(number: &str) -> String {
    format!("tel:{number}")
}

/// Message body embedded in the outbound deep links.
pub fn enquiry_text(car_name: &str, window: &BookingWindow, quote: &Quote) -> String {
    format!(
        "Hi, I want to book {} from {} to {} ({} days). Quoted total: Rs {:.0} (incl. Rs {:.0} refundable deposit).",
        car_name,
        window.start(),
        window.end(),
        quote.total_days,
        quote.grand_total,
        quote.deposit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_end_is_start_plus_minimum() {
        let w = BookingWindow::new(date(2026, 8, 25), 2);
        assert_eq!(w.end(), date(2026, 8, 27));
    }

    #[test]
    fn minimum_days_floor() {
        let mut w = BookingWindow::new(date(2026, 8, 25), 2);
        w.set_end(date(2026, 8, 25)); // same day as start
        assert_eq!(w.total_days(), 2);

        let q = quote(&w, 1500.0);
        assert_eq!(q.rental_cost, 3000.0);
        assert_eq!(q.grand_total, 3000.0 + DEPOSIT_INR);
    }

    #[test]
    fn end_before_start_clamps_to_floor() {
        let mut w = BookingWindow::new(date(2026, 8, 25), 3);
        w.set_end(date(2026, 8, 20));
        assert_eq!(w.end(), date(2026, 8, 27)); // start + (min - 1)
        assert!(w.total_days() >= 3);
    }

    #[test]
    fn moving_start_keeps_valid_end() {
        let mut w = BookingWindow::new(date(2026, 8, 25), 2);
        w.set_end(date(2026, 9, 10));
        w.set_start(date(2026, 9, 1));
        assert_eq!(w.end(), date(2026, 9, 10));
        assert_eq!(w.total_days(), 10);
    }

    #[test]
    fn moving_start_past_end_resets_end_to_floor() {
        let mut w = BookingWindow::new(date(2026, 8, 25), 2);
        w.set_end(date(2026, 8, 26));
        w.set_start(date(2026, 9, 5));
        assert_eq!(w.end(), date(2026, 9, 6)); // start + (min - 1)
        assert_eq!(w.total_days(), 2);
    }

    #[test]
    fn inclusive_duration() {
        let mut w = BookingWindow::new(date(2026, 8, 25), 1);
        w.set_end(date(2026, 8, 27));
        assert_eq!(w.total_days(), 3);
    }

    #[test]
    fn deep_links_carry_encoded_text() {
        let w = BookingWindow::new(date(2026, 8, 25), 2);
        let q = quote(&w, 2000.0);
        let text = enquiry_text("Hyundai i20", &w, &q);
        let link = whatsapp_link("919876543210", &text);
        assert!(link.starts_with("https://wa.me/919876543210?text="));
        assert!(link.contains("Hyundai%20i20"));
        assert!(!link.contains(' '));
        assert_eq!(tel_link("+919876543210"), "tel:+919876543210");
    }
}
