use error_stack::{Context, Report};

/// Converts a plain error into a `Report` of a context it converts into.
pub trait ErrorExt<Err>
where
    Self: Into<Err>,
    Err: Context,
{
    fn into_report(self) -> Report<Err> {
        Report::new(self.into())
    }
}

impl<T, Err> ErrorExt<Err> for T
where
    T: Into<Err>,
    Err: Context,
{
}

/// `change_context` for results carrying cosmrs's eyre-based error report,
/// which does not implement `Context` itself.
pub trait ResultCompatExt {
    type Ok;

    fn change_context<C>(self, context: C) -> Result<Self::Ok, Report<C>>
    where
        C: Context;
}

impl<T> ResultCompatExt for Result<T, cosmrs::ErrorReport> {
    type Ok = T;

    fn change_context<C>(self, context: C) -> Result<T, Report<C>>
    where
        C: Context,
    {
        error_stack::IntoReportCompat::into_report(self)
            .map_err(|report| report.change_context(context))
    }
}

#[cfg(test)]
mod tests {
    use error_stack::Report;
    use thiserror::Error;

    use super::{ErrorExt, ResultCompatExt};

    #[derive(Error, Debug)]
    enum Original {
        #[error("the original error")]
        Original,
    }

    #[derive(Error, Debug)]
    enum Converted {
        #[error("the converted error")]
        Converted(#[from] Original),
        #[error("some context")]
        Context,
    }

    #[test]
    fn into_report_converts_through_from() {
        let report: Report<Converted> = Original::Original.into_report();

        assert!(matches!(
            report.current_context(),
            Converted::Converted(Original::Original)
        ));
    }

    #[test]
    fn change_context_lifts_cosmrs_errors() {
        let result: Result<cosmrs::AccountId, _> = "not-an-address".parse();

        let report = ResultCompatExt::change_context(result, Converted::Context).unwrap_err();
        assert!(matches!(report.current_context(), Converted::Context));
    }
}
