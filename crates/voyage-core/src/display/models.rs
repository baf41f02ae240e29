//! Display implementations for domain models.
//!
//! This module contains all Display trait implementations for the core domain
//! models, separated from the model definitions to maintain clean separation of
//! concerns.
//!
//! The Display implementations provide:
//! - Markdown-formatted output for rich terminal display
//! - Consistent formatting with status icons and structured sections
//! - Context-aware display behavior for different use cases

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{CardType, Day, DurationParts, Event, EventState, Trip, TripStatus, Visibility};

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} (ID: {})", self.title, self.id)?;
        writeln!(f)?;

        // Metadata section
        writeln!(f, "- Status: {}", self.status.as_str())?;
        writeln!(f, "- Visibility: {}", self.visibility.as_str())?;
        if let (Some(start), Some(end)) = (&self.start_date, &self.end_date) {
            writeln!(f, "- Dates: {start} to {end}")?;
        }
        if self.days > 0 {
            writeln!(f, "- Days: {}", self.days)?;
        }
        writeln!(f, "- Progress: {}%", self.completed)?;
        writeln!(f, "- Created: {}", LocalDateTime(self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(self.updated_at))?;

        // Description as a paragraph
        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self
            .short_date
            .as_deref()
            .or(self.date.as_deref())
            .unwrap_or(self.id.as_str());
        writeln!(f, "## Day {}: {label}", self.order + 1)?;
        writeln!(f)?;

        if let Some(title) = &self.title {
            writeln!(f, "- Title: {title}")?;
        }
        if let Some(location) = &self.location {
            writeln!(f, "- Location: {location}")?;
        }
        if let Some(date) = &self.date {
            writeln!(f, "- Date: {date}")?;
        }

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        Ok(())
    }
}

impl Event {
    /// Format the event using the clean, compact display format.
    ///
    /// This uses the same format whether the event is displayed standalone
    /// or nested as an option of a multi card.
    fn fmt_event(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {} ({})",
            self.title.as_deref().unwrap_or("(untitled)"),
            self.state.with_icon()
        )?;
        writeln!(f)?;

        if let Some(time) = &self.start_time {
            match &self.end_time {
                Some(end) => writeln!(f, "- Time: {time} - {end}")?,
                None => writeln!(f, "- Time: {time}")?,
            }
        }
        if let Some(parts) = self.duration_min.and_then(DurationParts::from_minutes) {
            writeln!(f, "- Duration: {}", parts.text)?;
        }
        if let Some(location) = &self.location_name {
            writeln!(f, "- Location: {location}")?;
        }
        if let Some(cost) = self.cost {
            writeln!(f, "- Cost: {cost} {}", self.cost_currency)?;
        }

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if !self.options.is_empty() {
            writeln!(f)?;
            writeln!(f, "#### Options")?;
            writeln!(f)?;
            for option in &self.options {
                writeln!(
                    f,
                    "- {} ({})",
                    option.title.as_deref().unwrap_or("(untitled)"),
                    option.state.with_icon()
                )?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_event(f)
    }
}
