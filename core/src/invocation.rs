use std::fmt;

/// One fully built command line: program first, then its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    argv: Vec<String>,
}

impl Invocation {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn into_argv(self) -> Vec<String> {
        self.argv
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}
