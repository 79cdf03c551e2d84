//! The literal construction form.

/// Builds a record at a literal call site.
///
/// Fields are written as in a struct expression, including the `field`
/// shorthand for a local of the same name. Omitted fields take the defaults
/// chosen by the record's mode:
///
/// - `keep`: the record's declaration-time defaults, shared by every site;
/// - `ignore_defaults`: none, so omitted fields are empty (or the call fails
///   for a required field);
/// - `override`: defaults evaluated once for *this* call site. Running the
///   same site again reuses them, while a different site evaluates its own.
///
/// Evaluates to a [`crate::RecordResult`].
///
/// ```rust
/// use fresh_defaults::{Record, literal};
///
/// #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize, Record)]
/// struct Retry {
///     #[record(default = 3)]
///     attempts: u32,
///     #[record(default = String::from("linear"))]
///     backoff: String,
/// }
///
/// let retry = literal!(Retry { backoff: String::from("exponential") })?;
/// assert_eq!(retry.attempts, 3);
/// assert_eq!(retry.backoff, "exponential");
/// # Ok::<_, fresh_defaults::RecordError>(())
/// ```
///
/// Naming a field twice is a compile error:
///
/// ```rust,compile_fail
/// use fresh_defaults::{Record, literal};
///
/// #[derive(serde::Serialize, serde::Deserialize, Record)]
/// struct Retry {
///     attempts: u32,
/// }
///
/// let retry = literal!(Retry { attempts: 1, attempts: 2 });
/// ```
///
/// Types banned with `#[record(forbid_direct_construction)]` are rejected by
/// the construction guard here too: a `literal!` invocation is a direct
/// construction.
#[macro_export]
macro_rules! literal {
    ($record:path { $($field:ident $(: $value:expr)?),* $(,)? }) => {{
        const _: () = $crate::__private::assert_distinct_fields(&[$(::core::stringify!($field)),*]);
        static SITE: $crate::CallSite = $crate::CallSite::new();
        $crate::__private::literal_at::<$record>(
            &SITE,
            ::std::vec![$((
                ::core::stringify!($field),
                $crate::__private::to_value(&$crate::__literal_field!($field $(: $value)?)),
            )),*],
        )
    }};
}

/// Value of one `literal!` field: the expression, or the local named like
/// the field.
#[doc(hidden)]
#[macro_export]
macro_rules! __literal_field {
    ($field:ident) => {
        $field
    };
    ($field:ident : $value:expr) => {
        $value
    };
}
