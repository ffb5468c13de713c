//! Interface classes and their virtual function declarations.
//!
//! A declaration can span several lines, so the function builder survives
//! between calls in `ParseContext::function` and is fed one whitespace token
//! at a time. The argument list is collected word by word: the most recent
//! plain word is held back until it is known whether it names the argument or
//! is part of its type.

use super::{Line, ParseContext};
use crate::config::ParserConfig;
use crate::model::{Arg, ArgAttribute, Function, FunctionAttribute, Interface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReturnType,
    Name,
    Args,
    /// `=` was the last token of a line; the default value comes next.
    Default,
    /// Inside an argument attribute's parentheses.
    Attribute { depth: usize },
    /// After the closing paren, waiting for `;`.
    Tail,
}

/// What the token loop does after one step.
enum Step<'a> {
    Next,
    /// Feed this remainder of the current token to the (new) state.
    Again(&'a str),
    Commit,
}

#[derive(Debug)]
pub(crate) struct FunctionBuilder {
    function: Function,
    state: State,
    /// Type text collected so far for the current argument
    ty: String,
    /// Last plain word: the argument name if the argument ends here
    word: Option<String>,
    /// Annotation for the argument being collected
    attribute: Option<ArgAttribute>,
}

impl FunctionBuilder {
    fn new(function: Function) -> Self {
        Self {
            function,
            state: State::ReturnType,
            ty: String::new(),
            word: None,
            attribute: None,
        }
    }

    fn step<'a>(
        &mut self,
        token: &'a str,
        rest: &mut dyn Iterator<Item = &'a str>,
        ctx: &ParseContext,
        config: &ParserConfig,
    ) -> Step<'a> {
        match self.state {
            State::ReturnType => self.return_type(token),
            State::Name => self.name(token, ctx, config),
            State::Args => self.arg_token(token, rest, ctx, config),
            State::Default => self.default_value(token),
            State::Attribute { depth } => self.attribute_payload(token, depth),
            State::Tail => {
                if token.ends_with(';') {
                    Step::Commit
                } else {
                    Step::Next
                }
            }
        }
    }

    fn return_type<'a>(&mut self, token: &'a str) -> Step<'a> {
        if token == "virtual" || token == "inline" {
            return Step::Next;
        }

        let name = token.trim_start_matches('*');
        if name.len() != token.len() {
            let ret = &mut self.function.return_type;
            ret.push_str(&token[..token.len() - name.len()]);
            *ret = ret.trim().to_string();
            self.state = State::Name;
            return again_or_next(name);
        }

        if token.contains('(') {
            self.function.return_type = self.function.return_type.trim().to_string();
            self.state = State::Name;
            return Step::Again(token);
        }

        self.function.return_type.push_str(token);
        self.function.return_type.push(' ');
        Step::Next
    }

    fn name<'a>(&mut self, token: &'a str, ctx: &ParseContext, config: &ParserConfig) -> Step<'a> {
        let Some((head, after)) = token.split_once('(') else {
            self.set_name(token.trim_end_matches(';'));
            return if token.ends_with(';') {
                Step::Commit
            } else {
                Step::Next
            };
        };

        if !head.is_empty() {
            self.set_name(head);
        } else if self.function.name.is_empty() {
            // `Foo (`: the name went into the return type
            if let Some((ty, name)) = self.function.return_type.rsplit_once(' ') {
                let (ty, name) = (ty.trim_end().to_string(), name.to_string());
                self.set_name(&name);
                self.function.return_type = ty;
            }
        }
        self.state = State::Args;
        if after.is_empty() {
            return Step::Next;
        }
        if config.warn_spacing && !after.starts_with(')') {
            ctx.warn(
                "Function is missing whitespace between the opening parentheses and first arg",
                token,
            );
        }
        Step::Again(after)
    }

    fn set_name(&mut self, name: &str) {
        self.function.name = name.to_string();
        self.function.original_name = name.to_string();
    }

    fn arg_token<'a>(
        &mut self,
        token: &'a str,
        rest: &mut dyn Iterator<Item = &'a str>,
        ctx: &ParseContext,
        config: &ParserConfig,
    ) -> Step<'a> {
        if config.arg_attribute_prefix(token).is_some() {
            let name_end = token.find('(').unwrap_or(token.len());
            self.attribute = Some(ArgAttribute {
                name: token[..name_end].to_string(),
                value: String::new(),
            });
            return self.attribute_payload(&token[name_end..], 0);
        }

        let mut token = token;
        for deco in ["**", "*", "&"] {
            if let Some(after) = token.strip_prefix(deco) {
                self.flush_word();
                self.ty.push_str(deco);
                token = after;
                break;
            }
        }
        if token.is_empty() {
            return Step::Next;
        }

        if let Some(after) = token.strip_prefix(')') {
            self.finish_arg(None, None);
            self.state = State::Tail;
            return again_or_next(after);
        }

        // `name)` with no space before the closing paren
        if let Some(pos) = unmatched_close(token) {
            if config.warn_spacing {
                ctx.warn(
                    "Function is missing whitespace between the closing parentheses and first arg",
                    token,
                );
            }
            self.arg_token(&token[..pos], rest, ctx, config);
            return Step::Again(&token[pos..]);
        }

        if let Some(name) = token.strip_suffix(',') {
            let name = (!name.is_empty()).then(|| name.to_string());
            self.finish_arg(name, None);
            return Step::Next;
        }

        if token == "=" {
            return match rest.next() {
                Some(value) => self.default_value(value),
                None => {
                    self.state = State::Default;
                    Step::Next
                }
            };
        }

        self.flush_word();
        self.word = Some(token.to_string());
        Step::Next
    }

    fn default_value<'a>(&mut self, token: &'a str) -> Step<'a> {
        self.state = State::Args;
        let (value, after) = match unmatched_close(token) {
            Some(pos) => (&token[..pos], &token[pos..]),
            None => (token, ""),
        };
        self.finish_arg(None, Some(value.trim_end_matches(',').to_string()));
        again_or_next(after)
    }

    /// Collect attribute text up to the paren that closes it. Tokens are
    /// joined by a single space; nested parens are kept.
    fn attribute_payload<'a>(&mut self, text: &'a str, mut depth: usize) -> Step<'a> {
        let attr = self.attribute.get_or_insert_with(ArgAttribute::default);
        if !attr.value.is_empty() && !text.is_empty() {
            attr.value.push(' ');
        }

        for (idx, c) in text.char_indices() {
            match c {
                '(' => {
                    depth += 1;
                    if depth == 1 {
                        continue;
                    }
                }
                ')' => {
                    if depth <= 1 {
                        attr.value = attr.value.trim().to_string();
                        self.state = State::Args;
                        return again_or_next(&text[idx + 1..]);
                    }
                    depth -= 1;
                }
                _ => {}
            }
            attr.value.push(c);
        }

        self.state = State::Attribute { depth };
        Step::Next
    }

    fn flush_word(&mut self) {
        if let Some(word) = self.word.take() {
            self.ty.push_str(&word);
            self.ty.push(' ');
        }
    }

    /// Close the current argument. Without an explicit name the held-back
    /// word is the name; a lone `void` is an empty argument list.
    fn finish_arg(&mut self, name: Option<String>, default: Option<String>) {
        let name = match name {
            Some(name) => {
                self.flush_word();
                name
            }
            None => match self.word.take() {
                Some(word) => word,
                None => {
                    self.ty.clear();
                    return;
                }
            },
        };
        let ty = std::mem::take(&mut self.ty).trim().to_string();
        let attribute = self.attribute.take();

        if ty.is_empty() && name == "void" && default.is_none() {
            return;
        }

        self.function.args.push(Arg {
            name,
            ty,
            default,
            attribute,
        });
    }
}

fn again_or_next(rest: &str) -> Step<'_> {
    if rest.is_empty() {
        Step::Next
    } else {
        Step::Again(rest)
    }
}

/// Byte offset of the first `)` that has no matching `(` in `token`.
fn unmatched_close(token: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in token.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return Some(idx);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// `class ISteamFoo` opens an interface; inside one, collect its functions.
pub(crate) fn parse_interface(ctx: &mut ParseContext, line: &Line, config: &ParserConfig) {
    let opener = format!("class {}", config.interface_prefix);
    if line.code.starts_with(&opener) {
        let comment = ctx.comments.consume();
        let name = line.token(1);
        // Forward declarations and matchmaking response callbacks
        if name.ends_with(';') || name.ends_with("Response") {
            return;
        }
        ctx.interface = Some(Interface {
            name: name.to_string(),
            functions: Vec::new(),
            comment,
        });
        return;
    }

    if ctx.interface.is_some() {
        parse_function_line(ctx, line, config);
    }
}

fn parse_function_line(ctx: &mut ParseContext, line: &Line, config: &ParserConfig) {
    let mut code = line.code;

    if config.is_function_attribute(code) {
        match (code.find('('), code.rfind(')')) {
            (Some(open), Some(close)) if open < close => {
                ctx.function_attributes.push(FunctionAttribute {
                    name: code[..open].trim_end().to_string(),
                    value: code[open + 1..close].trim().to_string(),
                });
            }
            _ => ctx.warn("Malformed function attribute", code),
        }
        return;
    }

    let wrapper = config.private_wrapper.as_str();
    if !wrapper.is_empty() {
        if let Some(after) = code.strip_prefix(wrapper) {
            ctx.in_private = true;
            let after = after.trim_start();
            code = after.strip_prefix('(').unwrap_or(after).trim();
        }
    }
    let private = ctx.in_private;
    if ctx.in_private {
        if let Some(inner) = code.strip_suffix(')') {
            ctx.in_private = false;
            code = inner.trim_end();
        }
    }

    if ctx.function.is_none() && !(code.starts_with("virtual") || code.starts_with("inline")) {
        return;
    }
    // Destructor
    if code.contains('~') {
        return;
    }

    let mut builder = match ctx.function.take() {
        Some(builder) => builder,
        None => {
            // Depth 1 is the include guard
            let condition = if ctx.conditions.depth() > 1 {
                ctx.conditions.top().map(str::to_string)
            } else {
                None
            };
            FunctionBuilder::new(Function {
                comment: ctx.comments.consume(),
                private,
                attributes: std::mem::take(&mut ctx.function_attributes),
                condition,
                ..Function::default()
            })
        }
    };

    let line = Line::new(code);
    let mut tokens = line.tokens.iter().copied();
    let mut committed = false;
    'tokens: while let Some(token) = tokens.next() {
        let mut current = token;
        loop {
            match builder.step(current, &mut tokens, ctx, config) {
                Step::Next => break,
                Step::Again(rest) => current = rest,
                Step::Commit => {
                    committed = true;
                    break 'tokens;
                }
            }
        }
    }

    if !committed {
        ctx.function = Some(builder);
        return;
    }
    if let Some(interface) = ctx.interface.as_mut() {
        add_function(interface, builder.function, config);
    }
}

/// Append `function`, renaming overloads after the first argument type that
/// differs (or the argument count when none does).
fn add_function(interface: &mut Interface, mut function: Function, config: &ParserConfig) {
    let previous = interface
        .functions
        .iter_mut()
        .find(|f| f.original_name == function.original_name);

    if let Some(previous) = previous {
        let differing = function
            .args
            .iter()
            .zip(previous.args.iter())
            .find(|(a, b)| a.ty != b.ty);
        let (suffix, previous_suffix) = match differing {
            Some((a, b)) => (config.overload_suffix(&a.ty), config.overload_suffix(&b.ty)),
            None => (
                function.args.len().to_string(),
                previous.args.len().to_string(),
            ),
        };
        if previous.name == previous.original_name {
            previous.name = format!("{}_{}", previous.original_name, previous_suffix);
        }
        function.name = format!("{}_{}", function.original_name, suffix);
    }

    interface.functions.push(function);
}

#[cfg(test)]
mod tests {
    use crate::config::ParserConfig;
    use crate::model::Function;
    use crate::parser::Parser;

    fn functions_with(config: ParserConfig, body: &str) -> Vec<Function> {
        let text = format!("class ISteamTest\n{{\n{}\n}};\n", body);
        let mut parser = Parser::new(config);
        let file = parser.parse_source("isteamtest.h", &text).unwrap();
        assert_eq!(file.interfaces.len(), 1);
        file.interfaces[0].functions.clone()
    }

    fn functions(body: &str) -> Vec<Function> {
        functions_with(ParserConfig::default(), body)
    }

    fn arg_pairs(f: &Function) -> Vec<(&str, &str)> {
        f.args.iter().map(|a| (a.ty.as_str(), a.name.as_str())).collect()
    }

    #[test]
    fn missing_whitespace_around_parens() {
        let config = ParserConfig {
            warn_spacing: true,
            ..ParserConfig::default()
        };
        let funcs = functions_with(config, "\tvirtual void Foo(int x) = 0;\n\tvirtual int Bar( uint32 a, bool b) = 0;");
        assert_eq!(funcs[0].name, "Foo");
        assert_eq!(arg_pairs(&funcs[0]), vec![("int", "x")]);
        assert_eq!(funcs[1].return_type, "int");
        assert_eq!(arg_pairs(&funcs[1]), vec![("uint32", "a"), ("bool", "b")]);
    }

    #[test]
    fn name_separated_from_parens() {
        let funcs = functions(
            "\tvirtual void Foo ( int x ) = 0;\n\tvirtual const char * GetName (int n) = 0;",
        );
        assert_eq!(funcs[0].name, "Foo");
        assert_eq!(funcs[0].original_name, "Foo");
        assert_eq!(funcs[0].return_type, "void");
        assert_eq!(arg_pairs(&funcs[0]), vec![("int", "x")]);
        assert_eq!(funcs[1].name, "GetName");
        assert_eq!(funcs[1].return_type, "const char *");
        assert_eq!(arg_pairs(&funcs[1]), vec![("int", "n")]);
    }

    #[test]
    fn void_and_empty_argument_lists() {
        let funcs = functions("\tvirtual void A() = 0;\n\tvirtual void B( void ) = 0;\n\tvirtual void C(void) = 0;");
        assert_eq!(funcs.len(), 3);
        assert!(funcs.iter().all(|f| f.args.is_empty()));
    }

    #[test]
    fn pointer_and_reference_decorations() {
        let funcs = functions(
            "\tvirtual bool GetFoo( ISteamFoo **ppOut ) = 0;\n\
             \tvirtual void Set( const CSteamID &steamID, int n ) = 0;\n\
             \tvirtual const char *GetName() = 0;\n\
             \tvirtual uint8 * GetBuffer( uint32 * pcb ) = 0;",
        );
        assert_eq!(arg_pairs(&funcs[0]), vec![("ISteamFoo **", "ppOut")]);
        assert_eq!(
            arg_pairs(&funcs[1]),
            vec![("const CSteamID &", "steamID"), ("int", "n")]
        );
        assert_eq!(funcs[2].return_type, "const char *");
        assert_eq!(funcs[2].name, "GetName");
        assert_eq!(funcs[3].return_type, "uint8 *");
        assert_eq!(arg_pairs(&funcs[3]), vec![("uint32 *", "pcb")]);
    }

    #[test]
    fn argument_attributes_spanning_tokens() {
        let funcs = functions(
            "\tvirtual bool GetItems( STEAM_OUT_ARRAY_COUNT( punCount, Items desc ) SteamItem_t *pOut, uint32 *punCount ) = 0;\n\
             \tvirtual void Send( STEAM_ARRAY_COUNT(cItems) const uint64 *pItems, uint32 cItems ) = 0;",
        );
        let items = &funcs[0];
        assert_eq!(arg_pairs(items), vec![("SteamItem_t *", "pOut"), ("uint32 *", "punCount")]);
        let attr = items.args[0].attribute.as_ref().unwrap();
        assert_eq!(attr.name, "STEAM_OUT_ARRAY_COUNT");
        assert_eq!(attr.value, "punCount, Items desc");
        assert!(items.args[1].attribute.is_none());

        let send = &funcs[1];
        let attr = send.args[0].attribute.as_ref().unwrap();
        assert_eq!(attr.name, "STEAM_ARRAY_COUNT");
        assert_eq!(attr.value, "cItems");
        assert_eq!(send.args[0].ty, "const uint64 *");
    }

    #[test]
    fn defaults_and_multi_line_declarations() {
        let funcs = functions(
            "\tvirtual void Init( int nFlags = 0, const char *pchName = NULL) = 0;\n\
             \tvirtual bool Long( uint32 a,\n\
             \t\tuint32 b =\n\
             \t\t5 ) = 0;",
        );
        assert_eq!(funcs[0].args[0].default.as_deref(), Some("0"));
        assert_eq!(funcs[0].args[1].default.as_deref(), Some("NULL"));
        assert_eq!(arg_pairs(&funcs[0]), vec![("int", "nFlags"), ("const char *", "pchName")]);

        assert_eq!(funcs[1].name, "Long");
        assert_eq!(arg_pairs(&funcs[1]), vec![("uint32", "a"), ("uint32", "b")]);
        assert_eq!(funcs[1].args[1].default.as_deref(), Some("5"));
    }

    #[test]
    fn private_wrapper_marks_function() {
        let funcs = functions(
            "\tSTEAM_PRIVATE_API( virtual void RunFrame() = 0; )\n\
             \tvirtual void Public() = 0;",
        );
        assert_eq!(funcs.len(), 2);
        assert_eq!(funcs[0].name, "RunFrame");
        assert!(funcs[0].private);
        assert!(!funcs[1].private);
    }

    #[test]
    fn destructor_is_ignored() {
        let funcs = functions("\tvirtual ~ISteamTest() {}\n\tvirtual void Only() = 0;");
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].name, "Only");
    }

    #[test]
    fn inline_body_commits_at_first_semicolon() {
        let funcs = functions("\tinline bool IsReady() { return m_bReady; }");
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].name, "IsReady");
        assert_eq!(funcs[0].return_type, "bool");
    }

    #[test]
    fn overloads_are_disambiguated() {
        let funcs = functions(
            "\tvirtual bool GetStat( const char *pchName, int32 *pData ) = 0;\n\
             \tvirtual bool GetStat( const char *pchName, float *pData ) = 0;\n\
             \tvirtual void Reset() = 0;\n\
             \tvirtual void Reset( bool bAll ) = 0;",
        );
        let names: Vec<_> = funcs.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["GetStat_int32Ptr", "GetStat_floatPtr", "Reset_0", "Reset_1"]
        );
        assert!(funcs.iter().take(2).all(|f| f.original_name == "GetStat"));
    }

    #[test]
    fn function_attributes_attach_to_next_function() {
        let funcs = functions(
            "\tSTEAM_FLAT_NAME( GetFooByIndex )\n\
             \tSTEAM_METHOD_DESC( Returns the foo (if any) )\n\
             \tvirtual int GetFoo( int i ) = 0;\n\
             \tvirtual int Plain() = 0;",
        );
        let attrs: Vec<_> = funcs[0]
            .attributes
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_str()))
            .collect();
        assert_eq!(
            attrs,
            vec![
                ("STEAM_FLAT_NAME", "GetFooByIndex"),
                ("STEAM_METHOD_DESC", "Returns the foo (if any)"),
            ]
        );
        assert!(funcs[1].attributes.is_empty());
    }
}
