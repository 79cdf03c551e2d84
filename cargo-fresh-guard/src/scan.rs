//! The scanning phase: turns a parsed unit into structural events.
//!
//! Struct expressions are constructions. Struct patterns, the struct-shaped
//! targets of destructuring assignments, struct expressions ending in a bare
//! `..`, and the pattern argument of `matches!` are decompositions. Place
//! expressions on the left of `=` (`v[i]`, `*p`, `a.b`) are ordinary code.
//!
//! Bodies of other macro invocations are scanned when they parse as
//! comma-separated expressions, statements, or items. `macro_rules!`
//! transcribers are scanned with each `$fragment` replaced by its name and
//! each `$( ... )` repetition expanded once; a transcriber that still does
//! not parse is scanned group by group. Matchers are never scanned.

use std::collections::BTreeSet;

use proc_macro2::{Delimiter, Group, Span, TokenStream, TokenTree};
use syn::parse::{ParseStream, Parser};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::visit::{self, Visit};
use syn::{Block, Expr, Macro, Pat, Path, Token};

use crate::markers::type_name;
use crate::{Event, EventKind, Location};

/// Traits whose `#[automatically_derived]` impls are exempt by default.
///
/// Derived `Clone` and `Deserialize` build values field by field; they are
/// the primitives the runtime itself relies on.
pub const DEFAULT_EXEMPT_TRAITS: [&str; 2] = ["Clone", "Deserialize"];

/// Scans `file`, returning its events in source order.
#[must_use]
pub fn scan_file(origin: &str, file: &syn::File, exempt_traits: &BTreeSet<String>) -> Vec<Event> {
    let mut scanner = Scanner {
        origin,
        exempt_traits,
        self_types: Vec::new(),
        events: Vec::new(),
    };
    scanner.visit_file(file);
    scanner.events
}

fn is_repetition_operator(tree: &TokenTree) -> bool {
    matches!(tree, TokenTree::Punct(punct) if matches!(punct.as_char(), '*' | '+' | '?'))
}

/// Number of tokens (separator and operator) closing a `$( ... )`
/// repetition.
fn repetition_suffix_len(rest: &[TokenTree]) -> usize {
    match rest {
        [first, ..] if is_repetition_operator(first) => 1,
        [_, second, ..] if is_repetition_operator(second) => 2,
        _ => 0,
    }
}

/// Rewrites a transcriber into plain Rust tokens.
///
/// `$name` becomes `name`, `$crate` becomes `crate`, and `$( ... ) sep op`
/// becomes one copy of the repeated tokens. Spans are preserved.
fn substitute_fragments(tokens: TokenStream) -> TokenStream {
    let trees: Vec<TokenTree> = tokens.into_iter().collect();
    let mut out = TokenStream::new();
    let mut index = 0;
    while let Some(tree) = trees.get(index) {
        index += 1;
        match tree {
            TokenTree::Punct(punct) if punct.as_char() == '$' => match trees.get(index) {
                Some(TokenTree::Group(group)) if group.delimiter() == Delimiter::Parenthesis => {
                    out.extend(substitute_fragments(group.stream()));
                    let rest = trees.get(index + 1..).unwrap_or_default();
                    index += 1 + repetition_suffix_len(rest);
                }
                Some(TokenTree::Ident(_)) => {}
                _ => out.extend([tree.clone()]),
            },
            TokenTree::Group(group) => {
                let mut copy = Group::new(group.delimiter(), substitute_fragments(group.stream()));
                copy.set_span(group.span());
                out.extend([TokenTree::Group(copy)]);
            }
            _ => out.extend([tree.clone()]),
        }
    }
    out
}

struct Scanner<'a> {
    origin: &'a str,
    exempt_traits: &'a BTreeSet<String>,
    /// Types `Self` refers to, innermost last; `None` inside traits.
    self_types: Vec<Option<String>>,
    events: Vec<Event>,
}

impl Scanner<'_> {
    fn resolve(&self, path: &Path) -> Option<String> {
        if path.is_ident("Self") {
            self.self_types.last().cloned().flatten()
        } else {
            type_name(path)
        }
    }

    fn location(&self, span: Span) -> Location {
        let start = span.start();
        Location::new(self.origin, start.line, start.column + 1)
    }

    fn record(&mut self, kind: EventKind, path: &Path, span: Span) {
        let Some(type_id) = self.resolve(path) else {
            tracing::trace!(origin = self.origin, "unresolved Self outside an impl");
            return;
        };
        let location = self.location(span);
        self.events.push(Event {
            kind,
            type_id,
            location,
        });
    }

    fn is_exempt(&self, item: &syn::ItemImpl) -> bool {
        let derived = item
            .attrs
            .iter()
            .any(|attr| attr.path().is_ident("automatically_derived"));
        derived
            && item.trait_.as_ref().is_some_and(|(_, path, _)| {
                type_name(path).is_some_and(|name| self.exempt_traits.contains(&name))
            })
    }

    /// Visits the left-hand side of an assignment.
    ///
    /// Struct, tuple, array, tuple-struct and parenthesised targets make up
    /// a destructuring pattern; anything else is a place expression and is
    /// visited as ordinary code.
    fn visit_assignee(&mut self, target: &Expr) {
        match target {
            Expr::Struct(node) => {
                self.record(EventKind::Decomposition, &node.path, node.path.span());
                for field in &node.fields {
                    self.visit_assignee(&field.expr);
                }
                if let Some(rest) = &node.rest {
                    self.visit_expr(rest);
                }
            }
            Expr::Tuple(node) => {
                for elem in &node.elems {
                    self.visit_assignee(elem);
                }
            }
            Expr::Array(node) => {
                for elem in &node.elems {
                    self.visit_assignee(elem);
                }
            }
            Expr::Paren(node) => self.visit_assignee(&node.expr),
            Expr::Call(node) if matches!(node.func.as_ref(), Expr::Path(_)) => {
                self.visit_expr(&node.func);
                for arg in &node.args {
                    self.visit_assignee(arg);
                }
            }
            other => self.visit_expr(other),
        }
    }

    fn scan_matches(&mut self, mac: &Macro) -> bool {
        let parsed = mac.parse_body_with(|input: ParseStream| {
            let scrutinee: Expr = input.parse()?;
            input.parse::<Token![,]>()?;
            let pattern = Pat::parse_multi_with_leading_vert(input)?;
            let guard = if input.peek(Token![if]) {
                input.parse::<Token![if]>()?;
                Some(input.parse::<Expr>()?)
            } else {
                None
            };
            input.parse::<Option<Token![,]>>()?;
            Ok((scrutinee, pattern, guard))
        });
        let Ok((scrutinee, pattern, guard)) = parsed else {
            return false;
        };
        self.visit_expr(&scrutinee);
        self.visit_pat(&pattern);
        if let Some(condition) = &guard {
            self.visit_expr(condition);
        }
        true
    }

    /// Scans `tokens` as expressions, statements or items, whichever parses
    /// first. Returns `false` when none does.
    fn scan_tokens(&mut self, tokens: &TokenStream) -> bool {
        let exprs = Punctuated::<Expr, Token![,]>::parse_terminated;
        if let Ok(list) = exprs.parse2(tokens.clone()) {
            for expr in &list {
                self.visit_expr(expr);
            }
        } else if let Ok(stmts) = Block::parse_within.parse2(tokens.clone()) {
            for stmt in &stmts {
                self.visit_stmt(stmt);
            }
        } else if let Ok(file) = syn::parse2::<syn::File>(tokens.clone()) {
            self.visit_file(&file);
        } else {
            return false;
        }
        true
    }

    fn scan_macro_body(&mut self, mac: &Macro) {
        if !self.scan_tokens(&mac.tokens) {
            tracing::trace!(
                origin = self.origin,
                line = mac.span().start().line,
                "macro body is not Rust syntax; skipped"
            );
        }
    }

    /// Scans `tokens`, falling back to each delimited group when the whole
    /// stream does not parse.
    fn scan_fragments(&mut self, tokens: &TokenStream) {
        if self.scan_tokens(tokens) {
            return;
        }
        for tree in tokens.clone() {
            if let TokenTree::Group(group) = tree {
                self.scan_fragments(&group.stream());
            }
        }
    }

    /// Scans the transcriber of every rule of a `macro_rules!` definition.
    fn scan_macro_rules(&mut self, mac: &Macro) {
        let mut after_arrow = false;
        for tree in mac.tokens.clone() {
            match tree {
                TokenTree::Punct(punct) if punct.as_char() == '>' => after_arrow = true,
                TokenTree::Group(group) if after_arrow => {
                    after_arrow = false;
                    self.scan_fragments(&substitute_fragments(group.stream()));
                }
                _ => {}
            }
        }
    }
}

impl<'ast> Visit<'ast> for Scanner<'_> {
    fn visit_item_impl(&mut self, item: &'ast syn::ItemImpl) {
        if self.is_exempt(item) {
            return;
        }
        let self_type = match item.self_ty.as_ref() {
            syn::Type::Path(ty) => type_name(&ty.path),
            _ => None,
        };
        self.self_types.push(self_type);
        visit::visit_item_impl(self, item);
        self.self_types.pop();
    }

    fn visit_item_trait(&mut self, item: &'ast syn::ItemTrait) {
        self.self_types.push(None);
        visit::visit_item_trait(self, item);
        self.self_types.pop();
    }

    fn visit_item_macro(&mut self, item: &'ast syn::ItemMacro) {
        if item.ident.is_some() && item.mac.path.is_ident("macro_rules") {
            // `Self` in a transcriber depends on where the macro is invoked.
            self.self_types.push(None);
            self.scan_macro_rules(&item.mac);
            self.self_types.pop();
            return;
        }
        visit::visit_item_macro(self, item);
    }

    fn visit_macro(&mut self, mac: &'ast Macro) {
        let name = type_name(&mac.path);
        if name.as_deref() == Some("matches") && self.scan_matches(mac) {
            return;
        }
        self.scan_macro_body(mac);
    }

    fn visit_expr_struct(&mut self, node: &'ast syn::ExprStruct) {
        let bare_rest = node.dot2_token.is_some() && node.rest.is_none();
        let kind = if bare_rest {
            EventKind::Decomposition
        } else {
            EventKind::Construction
        };
        self.record(kind, &node.path, node.path.span());
        visit::visit_expr_struct(self, node);
    }

    fn visit_pat_struct(&mut self, node: &'ast syn::PatStruct) {
        self.record(EventKind::Decomposition, &node.path, node.path.span());
        visit::visit_pat_struct(self, node);
    }

    fn visit_expr_assign(&mut self, node: &'ast syn::ExprAssign) {
        for attr in &node.attrs {
            self.visit_attribute(attr);
        }
        self.visit_assignee(&node.left);
        self.visit_expr(&node.right);
    }
}
