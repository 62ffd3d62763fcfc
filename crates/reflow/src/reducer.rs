//! Reducers - pure functions producing new state from current state + action
//!
//! A reducer must be total: actions it does not handle return the state
//! unchanged. Larger reducers are assembled from smaller ones with
//! [`combine_reducers`] and [`lift_to_field`].

use std::fmt;

/// Boxed reducer, the unit combined by [`combine_reducers`]
pub type Reducer<S, A> = Box<dyn Fn(S, &A) -> S>;

/// Combine reducers over the same state into one
///
/// The state is threaded through the reducers in list order for the same
/// action: `rN(...r2(r1(state, action), action)..., action)`. Order matters
/// when reducers touch the same fields.
pub fn combine_reducers<S, A>(reducers: Vec<Reducer<S, A>>) -> Reducer<S, A>
where
    S: 'static,
    A: 'static,
{
    Box::new(move |state: S, action: &A| {
        reducers
            .iter()
            .fold(state, |state, reducer| reducer(state, action))
    })
}

/// Read and write access to one field of a state type
///
/// Usually built with the [`lens!`](crate::lens) macro.
pub struct Lens<S, T> {
    get: fn(&S) -> &T,
    get_mut: fn(&mut S) -> &mut T,
}

impl<S, T> Lens<S, T> {
    pub const fn new(get: fn(&S) -> &T, get_mut: fn(&mut S) -> &mut T) -> Self {
        Self { get, get_mut }
    }

    pub fn get<'a>(&self, state: &'a S) -> &'a T {
        (self.get)(state)
    }

    pub fn get_mut<'a>(&self, state: &'a mut S) -> &'a mut T {
        (self.get_mut)(state)
    }
}

impl<S, T> Clone for Lens<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, T> Copy for Lens<S, T> {}

impl<S, T> fmt::Debug for Lens<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lens").finish_non_exhaustive()
    }
}

/// Build a [`Lens`] for a (possibly nested) field path
///
/// ```
/// use reflow::lens;
///
/// #[derive(Default)]
/// struct Settings {
///     theme: String,
/// }
///
/// #[derive(Default)]
/// struct AppState {
///     settings: Settings,
/// }
///
/// let theme = lens!(AppState, settings.theme);
/// let mut state = AppState::default();
/// *theme.get_mut(&mut state) = "dark".to_string();
/// assert_eq!(theme.get(&state), "dark");
/// ```
#[macro_export]
macro_rules! lens {
    ($state:ty, $($field:ident).+) => {
        $crate::Lens::<$state, _>::new(
            |state| &state.$($field).+,
            |state| &mut state.$($field).+,
        )
    };
}

/// Lift a reducer over one field into a reducer over the whole state
///
/// The returned reducer runs `reducer` on the field addressed by `lens` and
/// writes the result back into its own copy of the state. Every other field
/// passes through untouched.
pub fn lift_to_field<S, T, A, R>(lens: Lens<S, T>, reducer: R) -> Reducer<S, A>
where
    S: 'static,
    T: Clone + 'static,
    A: 'static,
    R: Fn(T, &A) -> T + 'static,
{
    Box::new(move |mut state: S, action: &A| {
        let field = lens.get_mut(&mut state);
        *field = reducer(field.clone(), action);
        state
    })
}
