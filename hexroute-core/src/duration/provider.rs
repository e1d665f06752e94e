//! Duration provider trait and the outcome of a single routing query.

use std::time::Duration;

use crate::{Cell, TravelMode};

use super::error::DurationError;

/// Outcome of one directional routing query.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDuration {
    /// Travel duration in seconds as reported by the service.
    Seconds(f64),
    /// The service answered but had no usable route.
    Unavailable {
        /// Status code reported by the service.
        code: String,
        /// Optional detail accompanying the status.
        message: String,
    },
}

impl RouteDuration {
    /// Zero seconds, used for identical source and destination.
    pub const ZERO: Self = Self::Seconds(0.0);

    /// Raw seconds when a route was found.
    #[must_use]
    pub const fn seconds(&self) -> Option<f64> {
        match self {
            Self::Seconds(seconds) => Some(*seconds),
            Self::Unavailable { .. } => None,
        }
    }

    /// Convert to a [`Duration`].
    ///
    /// Returns `None` for unavailable routes and for values that cannot be a
    /// duration: negative, NaN, infinite or beyond [`Duration::MAX`].
    #[must_use]
    pub fn as_duration(&self) -> Option<Duration> {
        self.seconds()
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
    }
}

/// Resolve the travel duration between two cells for one travel mode.
///
/// Implementations must return [`RouteDuration::ZERO`] without any external
/// call when `source == destination`. Queries are directional; callers that
/// need symmetry enforce it themselves.
///
/// # Examples
///
/// ```
/// use hexroute_core::{Cell, DurationError, DurationProvider, RouteDuration, TravelMode};
///
/// /// Every distinct pair is one minute apart.
/// struct MinuteProvider;
///
/// impl DurationProvider for MinuteProvider {
///     fn duration(
///         &self,
///         source: &Cell,
///         destination: &Cell,
///         _mode: &TravelMode,
///     ) -> Result<RouteDuration, DurationError> {
///         if source == destination {
///             return Ok(RouteDuration::ZERO);
///         }
///         Ok(RouteDuration::Seconds(60.0))
///     }
/// }
///
/// let result = MinuteProvider.duration(&"a".into(), &"b".into(), &TravelMode::driving())?;
/// assert_eq!(result.seconds(), Some(60.0));
/// # Ok::<(), DurationError>(())
/// ```
pub trait DurationProvider {
    /// Return the duration from `source` to `destination` using `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`DurationError`] when the request cannot be completed. A
    /// service-reported failure is `Ok(RouteDuration::Unavailable { .. })`.
    fn duration(
        &self,
        source: &Cell,
        destination: &Cell,
        mode: &TravelMode,
    ) -> Result<RouteDuration, DurationError>;
}

impl<P: DurationProvider + ?Sized> DurationProvider for &P {
    fn duration(
        &self,
        source: &Cell,
        destination: &Cell,
        mode: &TravelMode,
    ) -> Result<RouteDuration, DurationError> {
        (**self).duration(source, destination, mode)
    }
}

impl<P: DurationProvider + ?Sized> DurationProvider for Box<P> {
    fn duration(
        &self,
        source: &Cell,
        destination: &Cell,
        mode: &TravelMode,
    ) -> Result<RouteDuration, DurationError> {
        (**self).duration(source, destination, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::CountingDurationProvider;

    #[rstest]
    fn identical_cells_cost_nothing() {
        let provider = CountingDurationProvider::uniform(90.0);
        let cell = Cell::from("a");
        let result = provider
            .duration(&cell, &cell, &TravelMode::driving())
            .expect("self-pair should resolve");
        assert_eq!(result, RouteDuration::ZERO);
        assert_eq!(provider.calls(), 0);
    }

    #[rstest]
    fn boxed_providers_delegate() {
        let provider: Box<dyn DurationProvider> =
            Box::new(CountingDurationProvider::uniform(90.0));
        let result = provider
            .duration(&"a".into(), &"b".into(), &TravelMode::driving())
            .expect("pair should resolve");
        assert_eq!(result.seconds(), Some(90.0));
    }

    #[rstest]
    #[case(RouteDuration::Seconds(42.0), Some(Duration::from_secs(42)))]
    #[case(RouteDuration::Seconds(3.5), Some(Duration::from_millis(3_500)))]
    #[case(RouteDuration::Seconds(-1.0), None)]
    #[case(RouteDuration::Seconds(f64::NAN), None)]
    #[case(RouteDuration::Seconds(f64::INFINITY), None)]
    #[case(RouteDuration::Seconds(1e20), None)]
    #[case(RouteDuration::Seconds(0.0), Some(Duration::ZERO))]
    #[case(
        RouteDuration::Unavailable { code: "NoRoute".into(), message: String::new() },
        None
    )]
    fn converts_to_std_duration(#[case] route: RouteDuration, #[case] expected: Option<Duration>) {
        assert_eq!(route.as_duration(), expected);
    }
}
