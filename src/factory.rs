use ahash::HashMap;

use crate::creator::{NodeCreator, STANDARD_FACTORIES};
use crate::dom::{Dom, Node};
use crate::error::Error;

/// A parameter of a factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    /// The parameter name, used to bind named arguments.
    pub name: &'static str,
    /// A required parameter needs a non-null argument.
    pub required: bool,
    /// Used when no argument is given. Without a default an optional
    /// parameter is left unset.
    pub default: Option<&'static str>,
}

impl Parameter {
    /// A parameter that must be given.
    pub const fn required(name: &'static str) -> Self {
        Parameter {
            name,
            required: true,
            default: None,
        }
    }

    /// A parameter that is unset unless given.
    pub const fn optional(name: &'static str) -> Self {
        Parameter {
            name,
            required: false,
            default: None,
        }
    }

    /// A parameter with a default value.
    pub const fn with_default(name: &'static str, default: &'static str) -> Self {
        Parameter {
            name,
            required: false,
            default: Some(default),
        }
    }

    // `disable_output_escaping` binds to `disableOutputEscaping`
    fn matches(&self, name: &str) -> bool {
        let mut ours = self.name.chars().filter(|c| *c != '_');
        let mut theirs = name.chars().filter(|c| *c != '_');
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a.eq_ignore_ascii_case(&b) => {}
                _ => return false,
            }
        }
    }
}

/// Builds a node from bound arguments, one per parameter in order.
pub type Build = fn(&mut NodeCreator<'_>, &[Option<String>]) -> Result<Node, Error>;

/// A node factory, addressed by its creatable name.
///
/// The creatable name is what follows the action in a dynamic call:
/// `appendXslIf` uses the `XslIf` factory.
#[derive(Clone, Copy)]
pub struct Factory {
    pub name: &'static str,
    /// Declared in order. The list must be `'static`; bind it to a `const`
    /// item, since a slice of `Parameter::*` calls written inline isn't
    /// promoted.
    pub parameters: &'static [Parameter],
    pub build: Build,
}

impl std::fmt::Debug for Factory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl Factory {
    /// Bind arguments to the parameters of this factory.
    ///
    /// `call` names the call in error messages.
    pub fn bind(&self, call: &str, arguments: Arguments) -> Result<Vec<Option<String>>, Error> {
        let Arguments { positional, named } = arguments;
        if positional.len() > self.parameters.len() {
            return Err(Error::TooManyArguments {
                call: call.to_string(),
                expected: self.parameters.len(),
                given: positional.len(),
            });
        }
        // outer None: no argument given; inner None: explicit null
        let mut slots: Vec<Option<Option<String>>> = vec![None; self.parameters.len()];
        for (slot, value) in slots.iter_mut().zip(positional) {
            *slot = Some(value);
        }
        for (name, value) in named {
            let index = self
                .parameters
                .iter()
                .position(|parameter| parameter.matches(&name))
                .ok_or_else(|| Error::UnknownParameter {
                    call: call.to_string(),
                    parameter: name.clone(),
                })?;
            if slots[index].is_some() {
                return Err(Error::DuplicateArgument {
                    call: call.to_string(),
                    parameter: self.parameters[index].name.to_string(),
                });
            }
            slots[index] = Some(value);
        }
        self.parameters
            .iter()
            .zip(slots)
            .map(|(parameter, slot)| match slot {
                Some(Some(value)) => Ok(Some(value)),
                _ if parameter.required => Err(Error::MissingArgument {
                    call: call.to_string(),
                    parameter: parameter.name.to_string(),
                }),
                Some(None) => Ok(None),
                None => Ok(parameter.default.map(String::from)),
            })
            .collect()
    }
}

/// Arguments for a factory call, positional and named.
///
/// A null argument (see [`Arguments::null`]) leaves an optional
/// parameter unset, even if it has a default.
///
/// ```rust
/// use sugardom::Arguments;
///
/// let arguments = Arguments::new().named("mode", "text").named("select", "//text()");
/// let arguments: Arguments = ["@foo", "<X>"].into();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    positional: Vec<Option<String>>,
    named: Vec<(String, Option<String>)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a positional argument.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.positional.push(Some(value.into()));
        self
    }

    /// Add a positional null argument.
    pub fn null(mut self) -> Self {
        self.positional.push(None);
        self
    }

    /// Add a named argument.
    pub fn named(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.named.push((name.into(), Some(value.into())));
        self
    }

    /// Add a named null argument.
    pub fn named_null(mut self, name: impl Into<String>) -> Self {
        self.named.push((name.into(), None));
        self
    }

    /// The number of arguments, positional and named.
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Arguments {
    fn from(values: [S; N]) -> Self {
        values
            .into_iter()
            .fold(Arguments::new(), |arguments, value| arguments.arg(value))
    }
}

impl<S: Into<String>> From<Vec<S>> for Arguments {
    fn from(values: Vec<S>) -> Self {
        values
            .into_iter()
            .fold(Arguments::new(), |arguments, value| arguments.arg(value))
    }
}

/// The registry of factories, looked up by creatable name ignoring case.
#[derive(Debug, Clone)]
pub struct FactoryTable {
    factories: HashMap<String, Factory>,
}

impl FactoryTable {
    /// An empty table.
    pub fn new() -> Self {
        FactoryTable {
            factories: HashMap::default(),
        }
    }

    /// The table every [`Dom`] starts with: the XSL elements plus
    /// `Element`, `ElementNS`, `Comment` and `Text`.
    pub fn standard() -> Self {
        let mut table = Self::new();
        for factory in STANDARD_FACTORIES {
            table.insert(*factory);
        }
        table
    }

    /// Add a factory, returning the one it replaces.
    pub fn insert(&mut self, factory: Factory) -> Option<Factory> {
        self.factories
            .insert(factory.name.to_ascii_lowercase(), factory)
    }

    /// Look up a factory by creatable name.
    pub fn get(&self, name: &str) -> Option<Factory> {
        self.factories.get(&name.to_ascii_lowercase()).copied()
    }

    /// The creatable names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = self
            .factories
            .values()
            .map(|factory| factory.name)
            .collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

impl Default for FactoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// ## Factories
impl Dom {
    /// The factories dynamic calls can use.
    ///
    /// ```rust
    /// let dom = sugardom::Dom::new();
    /// assert!(dom.factories().get("xslif").is_some());
    /// assert!(dom.factories().names().contains(&"ElementNS"));
    /// ```
    pub fn factories(&self) -> &FactoryTable {
        &self.factories
    }

    /// Register a factory, replacing any with the same creatable name.
    ///
    /// ```rust
    /// use sugardom::{Dom, Factory, Parameter};
    ///
    /// const PARAMETERS: &[Parameter] = &[Parameter::optional("class")];
    ///
    /// let mut dom = Dom::new();
    /// dom.register_factory(Factory {
    ///     name: "Hr",
    ///     parameters: PARAMETERS,
    ///     build: |creator, _| creator.create_element("hr", ""),
    /// });
    /// assert!(dom.factories().get("hr").is_some());
    /// ```
    pub fn register_factory(&mut self, factory: Factory) -> Option<Factory> {
        self.factories.insert(factory)
    }
}
