/// Result of a step that may fall back to a default instead of failing.
///
/// `Degraded` carries the fallback value together with the error that forced
/// it, so callers decide whether to mask or propagate the failure.
#[derive(Debug)]
pub enum Outcome<T, E> {
    Ok(T),
    Degraded(T, E),
    Failed(E),
}

impl<T, E> Outcome<T, E> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(..))
    }

    pub fn cause(&self) -> Option<&E> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Degraded(_, e) | Outcome::Failed(e) => Some(e),
        }
    }

    /// Strict view: degradation counts as failure.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Ok(v) => Ok(v),
            Outcome::Degraded(_, e) | Outcome::Failed(e) => Err(e),
        }
    }

    /// Lenient view: the fallback value stands in for the failure.
    pub fn masked(self) -> Result<T, E> {
        match self {
            Outcome::Ok(v) | Outcome::Degraded(v, _) => Ok(v),
            Outcome::Failed(e) => Err(e),
        }
    }

    /// The value, if there is one, with any cause discarded.
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Ok(v) | Outcome::Degraded(v, _) => Some(v),
            Outcome::Failed(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Ok(v) => Outcome::Ok(f(v)),
            Outcome::Degraded(v, e) => Outcome::Degraded(f(v), e),
            Outcome::Failed(e) => Outcome::Failed(e),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Outcome::Ok(v),
            Err(e) => Outcome::Failed(e),
        }
    }
}
