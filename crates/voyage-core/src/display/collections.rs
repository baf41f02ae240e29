//! Collection wrapper types for displaying groups of domain objects.
//!
//! This module provides wrapper types that format collections of domain objects
//! with consistent structure and empty collection handling.

use std::{fmt, ops::Index};

use crate::models::{Day, Event, Trip};

/// Newtype wrapper for displaying collections of trips.
///
/// This provides clean Display formatting for trip collections without title
/// handling, allowing consumers to handle titles separately. Handles empty
/// collections gracefully.
pub struct Trips(pub Vec<Trip>);

impl Trips {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of trips in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get a reference to the trip at the given index.
    pub fn get(&self, index: usize) -> Option<&Trip> {
        self.0.get(index)
    }

    /// Get an iterator over the trips.
    pub fn iter(&self) -> std::slice::Iter<'_, Trip> {
        self.0.iter()
    }
}

impl Index<usize> for Trips {
    type Output = Trip;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Trips {
    type Item = Trip;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Trips {
    type Item = &'a Trip;
    type IntoIter = std::slice::Iter<'a, Trip>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Trips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No trips found.")
        } else {
            for trip in &self.0 {
                write!(f, "{}", trip)?;
                writeln!(f)?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying collections of days.
pub struct Days(pub Vec<Day>);

impl Days {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of days in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the days.
    pub fn iter(&self) -> std::slice::Iter<'_, Day> {
        self.0.iter()
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No days found.")
        } else {
            for day in &self.0 {
                write!(f, "{}", day)?;
                writeln!(f)?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying collections of events.
///
/// This wrapper provides Display implementation for collections of events
/// without requiring title formatting logic. It handles empty collections
/// gracefully and formats each event using the existing Event Display trait.
pub struct Events(pub Vec<Event>);

impl Events {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of events in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get a reference to the event at the given index.
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.0.get(index)
    }

    /// Get an iterator over the events.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.0.iter()
    }
}

impl Index<usize> for Events {
    type Output = Event;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Events {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Events {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No events found.")
        } else {
            for event in &self.0 {
                write!(f, "{}", event)?;
            }
            Ok(())
        }
    }
}
