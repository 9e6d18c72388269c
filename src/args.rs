use std::fmt;

/// Arguments captured for one invocation of a wrapped operation.
///
/// They are only ever read: every attempt gets the very same values, and the
/// failure messages quote them.
pub trait Arguments {
    /// Whether no arguments were supplied at all.
    fn is_empty(&self) -> bool {
        false
    }

    fn fmt_args(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl Arguments for () {
    fn is_empty(&self) -> bool {
        true
    }

    fn fmt_args(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("()")
    }
}

impl<T: fmt::Debug> Arguments for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }

    fn fmt_args(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

macro_rules! tuple_arguments {
    ($($name:ident)+) => {
        impl<$($name: fmt::Debug),+> Arguments for ($($name,)+) {
            #[allow(non_snake_case)]
            fn fmt_args(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let ($($name,)+) = self;
                let mut tuple = f.debug_tuple("");
                $(tuple.field($name);)+
                tuple.finish()
            }
        }
    };
}

tuple_arguments!(A);
tuple_arguments!(A B);
tuple_arguments!(A B C);
tuple_arguments!(A B C D);
tuple_arguments!(A B C D E);
tuple_arguments!(A B C D E F);
tuple_arguments!(A B C D E F G);
tuple_arguments!(A B C D E F G H);

/// Renders arguments for a log line, spelling out when there are none.
pub(crate) struct Shown<'a, A: ?Sized>(pub(crate) &'a A);

impl<A: Arguments + ?Sized> fmt::Display for Shown<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("no positional arguments")
        } else {
            self.0.fmt_args(f)
        }
    }
}
