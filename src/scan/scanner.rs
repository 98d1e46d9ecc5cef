//! Single-pass scanner over the token stream.
//!
//! Only three facts are needed from a file (namespace, imports, top-level
//! declarations), and PHP's syntax for all three is regular enough to
//! pick out with a small automaton plus a brace-depth counter. Type bodies
//! are skipped by counting braces instead of parsing them.

use tracing::{debug, trace};

use super::facts::{DeclaredType, ScanFacts, TypeKind};
use crate::base::constants::NS_SEPARATOR;
use crate::base::{join_name, last_segment, strip_leading_separator};
use crate::parser::{Lexer, SyntaxKind, Token};

/// Scan a token stream. Never fails: malformed input yields whatever facts
/// were gathered before the scanner lost track.
pub fn scan<'a, I>(tokens: I) -> ScanFacts
where
    I: IntoIterator<Item = Token<'a>>,
{
    let mut scanner = Scanner::default();
    for token in tokens {
        if token.kind.is_trivia() {
            continue;
        }
        if scanner.step(&token) == Flow::Halt {
            trace!("[SCAN] halted at line {}", token.line);
            break;
        }
    }
    scanner.finish()
}

/// Tokenize and scan a complete PHP source file.
pub fn scan_source(source: &str) -> ScanFacts {
    scan(Lexer::new(source))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ScanState {
    /// Looking for top-level keywords.
    #[default]
    Scanning,
    NamespaceName,
    ImportClause,
    ImportAlias,
    /// Saw a declaration keyword; the next name is the type name.
    TypeName(TypeKind),
    /// Skipping a declaration body. `base_depth` is the brace depth the
    /// declaration started at.
    TypeBody { opened: bool, base_depth: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Halt,
}

/// Text buffers built up while inside a namespace or import statement.
#[derive(Debug, Default)]
struct Accumulator {
    namespace: String,
    target: String,
    alias: String,
    /// `A\B\` while inside `use A\B\{ ... }`.
    group_prefix: Option<String>,
    /// `use function ...;` / `use const ...;`
    skip_statement: bool,
    /// `function`/`const` entry inside a group import.
    skip_entry: bool,
}

impl Accumulator {
    fn reset_import(&mut self) {
        self.reset_entry();
        self.group_prefix = None;
        self.skip_statement = false;
    }

    fn reset_entry(&mut self) {
        self.target.clear();
        self.alias.clear();
        self.skip_entry = false;
    }

    fn start_group(&mut self) {
        let mut prefix = strip_leading_separator(&self.target).to_string();
        if !prefix.is_empty() && !prefix.ends_with(NS_SEPARATOR) {
            prefix.push(NS_SEPARATOR);
        }
        self.group_prefix = Some(prefix);
        self.target.clear();
    }

    /// Canonical (no leading `\`) target of the entry being built.
    fn qualified_target(&self) -> String {
        let target = strip_leading_separator(&self.target);
        match &self.group_prefix {
            Some(prefix) => format!("{prefix}{target}"),
            None => target.to_string(),
        }
    }

    fn is_skipped(&self) -> bool {
        self.skip_statement || self.skip_entry
    }
}

#[derive(Debug, Default)]
struct Scanner {
    state: ScanState,
    depth: u32,
    /// Depth of the innermost braced `namespace X { ... }` block (0 if none).
    namespace_depth: u32,
    /// Last significant token, ignoring class modifiers.
    prev: Option<SyntaxKind>,
    acc: Accumulator,
    facts: ScanFacts,
}

impl Scanner {
    fn step(&mut self, token: &Token<'_>) -> Flow {
        let kind = token.kind;
        match self.state {
            ScanState::Scanning => {
                if self.top_level(kind) == Flow::Halt {
                    return Flow::Halt;
                }
            }
            ScanState::NamespaceName => self.namespace_name(token),
            ScanState::ImportClause => self.import_clause(token),
            ScanState::ImportAlias => self.import_alias(token),
            ScanState::TypeName(type_kind) => self.type_name(type_kind, token),
            ScanState::TypeBody { opened, .. } => {
                // Declarations without a body end at the terminator.
                if kind == SyntaxKind::SEMICOLON && !opened {
                    self.state = ScanState::Scanning;
                }
            }
        }

        self.track_braces(kind);

        if !matches!(
            kind,
            SyntaxKind::ABSTRACT_KW | SyntaxKind::FINAL_KW | SyntaxKind::READONLY_KW
        ) {
            self.prev = Some(kind);
        }
        Flow::Continue
    }

    fn top_level(&mut self, kind: SyntaxKind) -> Flow {
        match kind {
            SyntaxKind::NAMESPACE_KW => {
                self.acc.namespace.clear();
                self.state = ScanState::NamespaceName;
            }
            // `function () use ($x)` captures are not imports
            SyntaxKind::USE_KW
                if self.depth == self.namespace_depth
                    && self.prev != Some(SyntaxKind::R_PAREN) =>
            {
                self.acc.reset_import();
                self.state = ScanState::ImportClause;
            }
            SyntaxKind::HALT_COMPILER_KW => return Flow::Halt,
            _ => {
                // `Foo::class` and `new class {}` are not declarations
                let declares = !matches!(
                    self.prev,
                    Some(SyntaxKind::COLON_COLON | SyntaxKind::NEW_KW)
                );
                if let Some(type_kind) = TypeKind::from_keyword(kind).filter(|_| declares) {
                    self.state = ScanState::TypeName(type_kind);
                }
            }
        }
        Flow::Continue
    }

    fn namespace_name(&mut self, token: &Token<'_>) {
        match token.kind {
            // `namespace\foo()` is a relative name, not a declaration
            SyntaxKind::NS_SEPARATOR if self.acc.namespace.is_empty() => {
                self.state = ScanState::Scanning;
            }
            kind if kind.is_name_like() || kind == SyntaxKind::NS_SEPARATOR => {
                self.acc.namespace.push_str(token.text);
            }
            SyntaxKind::SEMICOLON => {
                self.commit_namespace();
                self.state = ScanState::Scanning;
            }
            SyntaxKind::L_BRACE => {
                self.commit_namespace();
                self.namespace_depth = self.depth + 1;
                self.state = ScanState::Scanning;
            }
            _ => {}
        }
    }

    fn import_clause(&mut self, token: &Token<'_>) {
        match token.kind {
            SyntaxKind::FUNCTION_KW | SyntaxKind::CONST_KW if self.acc.target.is_empty() => {
                if self.acc.group_prefix.is_some() {
                    self.acc.skip_entry = true;
                } else {
                    self.acc.skip_statement = true;
                }
            }
            SyntaxKind::AS_KW => {
                self.acc.alias.clear();
                self.state = ScanState::ImportAlias;
            }
            kind if kind.is_name_like() || kind == SyntaxKind::NS_SEPARATOR => {
                self.acc.target.push_str(token.text);
            }
            SyntaxKind::L_BRACE => self.acc.start_group(),
            SyntaxKind::R_BRACE => {
                self.commit_import();
                self.acc.group_prefix = None;
            }
            SyntaxKind::COMMA => self.commit_import(),
            SyntaxKind::SEMICOLON => {
                self.commit_import();
                self.state = ScanState::Scanning;
            }
            _ => {}
        }
    }

    fn import_alias(&mut self, token: &Token<'_>) {
        match token.kind {
            kind if kind.is_name_like() => self.acc.alias.push_str(token.text),
            SyntaxKind::COMMA => {
                self.commit_import();
                self.state = ScanState::ImportClause;
            }
            SyntaxKind::R_BRACE => {
                self.commit_import();
                self.acc.group_prefix = None;
                self.state = ScanState::ImportClause;
            }
            SyntaxKind::SEMICOLON => {
                self.commit_import();
                self.state = ScanState::Scanning;
            }
            _ => {}
        }
    }

    fn type_name(&mut self, type_kind: TypeKind, token: &Token<'_>) {
        if !token.kind.is_name_like() {
            self.state = ScanState::Scanning;
            return;
        }

        let namespace = self.facts.namespace().unwrap_or_default();
        let name = join_name(namespace, token.text);
        trace!("[SCAN] {} {} (line {})", type_kind, name, token.line);
        self.facts.push_type(DeclaredType::new(name, type_kind));
        self.state = ScanState::TypeBody {
            opened: false,
            base_depth: self.depth,
        };
    }

    fn track_braces(&mut self, kind: SyntaxKind) {
        if kind.opens_brace() {
            self.depth += 1;
            if let ScanState::TypeBody { opened, .. } = &mut self.state {
                *opened = true;
            }
        } else if kind == SyntaxKind::R_BRACE {
            self.depth = self.depth.saturating_sub(1);
            if self.depth < self.namespace_depth {
                self.namespace_depth = self.depth;
            }
            if let ScanState::TypeBody {
                opened: true,
                base_depth,
            } = self.state
            {
                if self.depth == base_depth {
                    self.state = ScanState::Scanning;
                }
            }
        }
    }

    fn commit_namespace(&mut self) {
        let namespace = std::mem::take(&mut self.acc.namespace);
        trace!("[SCAN] namespace '{}'", namespace);
        self.facts.set_namespace(namespace);
    }

    fn commit_import(&mut self) {
        if !self.acc.target.is_empty() && !self.acc.is_skipped() {
            let target = self.acc.qualified_target();
            let short_name = if self.acc.alias.is_empty() {
                last_segment(&target).to_string()
            } else {
                self.acc.alias.clone()
            };
            if !short_name.is_empty() {
                trace!("[SCAN] use {} as {}", target, short_name);
                if let Some(previous) = self.facts.insert_alias(short_name.clone(), target) {
                    trace!("[SCAN] alias '{}' replaces {}", short_name, previous);
                }
            }
        }
        self.acc.reset_entry();
    }

    fn finish(self) -> ScanFacts {
        if self.state != ScanState::Scanning {
            debug!(
                "[SCAN] input ended in state {:?} at depth {}; keeping partial facts",
                self.state, self.depth
            );
        }
        debug!(
            "[SCAN] namespace={:?} aliases={} types={}",
            self.facts.namespace(),
            self.facts.aliases().len(),
            self.facts.declared_types().len()
        );
        self.facts
    }
}
