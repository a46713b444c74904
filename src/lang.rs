//! Language table
//!
//! Maps a language name to the command used to run a solution and, for
//! compiled languages, the command that builds it first. The solution for a
//! problem directory `foo/` is expected at `foo/foo.<ext>`.
//!
//! ## Placeholders
//!
//! - `{dirname}` - problem directory, trailing separators stripped
//! - `{simplename}` - last component of `{dirname}`
//! - `{name}` - `{dirname}/{simplename}`
//! - `{fin}` - source file (compiled languages only)
//! - `{fout}` - file that gets executed (script or compiled binary)

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info};

use crate::harness::process::shell;

/// Errors from resolving or building a solution.
#[derive(Debug, Error)]
pub enum LangError {
    #[error("Wrong language specified: '{name}' (available: {available})")]
    UnknownLanguage { name: String, available: String },

    #[error("compilation error! Tried command: {command:?}\n{stderr}")]
    Compilation { command: String, stderr: String },

    #[error("failed to start compiler {command:?}: {source}")]
    CompilerLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Supported solution languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Ruby,
    Java,
    ObjC,
    C,
    Cpp,
}

/// Command templates for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageSpec {
    pub source_template: Option<&'static str>,
    pub output_template: &'static str,
    pub run_template: &'static str,
    pub compile_template: Option<&'static str>,
}

/// Resolved commands for one problem directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    /// Command that runs the solution; test input is piped to its stdin
    pub run_command: String,
    pub compile_command: Option<String>,
}

impl Language {
    /// All languages, sorted by name.
    pub const ALL: [Language; 6] = [
        Language::C,
        Language::Cpp,
        Language::Java,
        Language::ObjC,
        Language::Python,
        Language::Ruby,
    ];

    pub const DEFAULT: Language = Language::Python;

    pub fn name(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Ruby => "ruby",
            Language::Java => "java",
            Language::ObjC => "objc",
            Language::C => "c",
            Language::Cpp => "cpp",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, LangError> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.name() == name)
            .ok_or_else(|| LangError::UnknownLanguage {
                name: name.to_string(),
                available: available_names(),
            })
    }

    pub fn spec(self) -> LanguageSpec {
        match self {
            Language::Python => LanguageSpec {
                source_template: None,
                output_template: "{name}.py",
                run_template: "python {fout}",
                compile_template: None,
            },
            Language::Ruby => LanguageSpec {
                source_template: None,
                output_template: "{name}.rb",
                run_template: "ruby {fout}",
                compile_template: None,
            },
            Language::Java => LanguageSpec {
                source_template: Some("{name}.java"),
                output_template: "{simplename}",
                run_template: "java -cp {dirname} {fout}",
                compile_template: Some("javac {fin}"),
            },
            Language::ObjC => LanguageSpec {
                source_template: Some("{name}.m"),
                output_template: "{name}.m.out",
                run_template: "{fout}",
                compile_template: Some("clang -ObjC -framework Foundation {fin} -o {fout}"),
            },
            Language::C => LanguageSpec {
                source_template: Some("{name}.c"),
                output_template: "{name}.c.out",
                run_template: "{fout}",
                compile_template: Some("gcc -O2 {fin} -o {fout}"),
            },
            Language::Cpp => LanguageSpec {
                source_template: Some("{name}.cpp"),
                output_template: "{name}.cpp.out",
                run_template: "{fout}",
                compile_template: Some("g++ -O2 {fin} -o {fout}"),
            },
        }
    }

    /// Resolve the run (and compile) commands for the problem at `dirname`.
    pub fn plan(self, dirname: &str) -> BuildPlan {
        let spec = self.spec();
        let dirname = dirname.trim_end_matches(['/', '\\']);
        let simplename = dirname.rsplit(['/', '\\']).next().unwrap_or(dirname);
        let name = Path::new(dirname).join(simplename).to_string_lossy().into_owned();

        let mut vars = Vars {
            dirname,
            simplename,
            name: &name,
            fin: String::new(),
            fout: String::new(),
        };
        vars.fin = spec.source_template.map(|t| vars.render(t)).unwrap_or_default();
        vars.fout = vars.render(spec.output_template);

        BuildPlan {
            run_command: vars.render(spec.run_template),
            compile_command: spec.compile_template.map(|t| vars.render(t)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = LangError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Comma-separated language names, for help and error text.
pub fn available_names() -> String {
    Language::ALL.map(Language::name).join(", ")
}

struct Vars<'a> {
    dirname: &'a str,
    simplename: &'a str,
    name: &'a str,
    fin: String,
    fout: String,
}

impl Vars<'_> {
    fn render(&self, template: &str) -> String {
        template
            .replace("{dirname}", self.dirname)
            .replace("{simplename}", self.simplename)
            .replace("{name}", self.name)
            .replace("{fin}", &self.fin)
            .replace("{fout}", &self.fout)
    }
}

/// Run the plan's compile step, if any.
///
/// The compiler's stderr is captured and returned in the error on failure.
pub fn compile(plan: &BuildPlan) -> Result<(), LangError> {
    let Some(command) = plan.compile_command.as_deref() else {
        return Ok(());
    };

    info!(command, "compiling solution");
    let output = shell(command).output().map_err(|source| LangError::CompilerLaunch {
        command: command.to_string(),
        source,
    })?;

    if output.status.success() {
        debug!(command, "compilation succeeded");
        Ok(())
    } else {
        Err(LangError::Compilation {
            command: command.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
