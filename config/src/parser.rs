use crate::{
    ast::{AtomDecl, Item, LineDecl, Prop, Script, Setting, Spanned, Value},
    error::ParseError,
};
use chumsky::prelude::*;

fn comment() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    just('#')
        .then(take_until(just('\n').or(end().to('\n'))))
        .padded()
        .ignored()
}

fn ws() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    filter(|c: &char| c.is_whitespace())
        .ignored()
        .or(comment())
        .repeated()
        .ignored()
}

fn required_ws() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    filter(|c: &char| c.is_whitespace())
        .repeated()
        .at_least(1)
        .ignored()
}

fn ident() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .chain(filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_').repeated())
        .collect()
}

fn spanned_ident() -> impl Parser<char, Spanned<String>, Error = Simple<char>> + Clone {
    ident().map_with_span(Spanned::new)
}

fn string_literal() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    just('"')
        .ignore_then(
            filter(|c: &char| *c != '"' && *c != '\\')
                .or(just('\\').ignore_then(any()))
                .repeated(),
        )
        .then_ignore(just('"'))
        .collect()
}

fn spanned_string_literal() -> impl Parser<char, Spanned<String>, Error = Simple<char>> + Clone {
    string_literal().map_with_span(Spanned::new)
}

fn number() -> impl Parser<char, f64, Error = Simple<char>> + Clone {
    just('-')
        .or_not()
        .chain::<char, _, _>(filter(|c: &char| c.is_ascii_digit()).repeated().at_least(1))
        .chain::<char, _, _>(
            just('.')
                .chain(filter(|c: &char| c.is_ascii_digit()).repeated().at_least(1))
                .or_not()
                .flatten(),
        )
        .collect::<String>()
        .try_map(|s, span| {
            s.parse::<f64>()
                .map_err(|_| Simple::custom(span, "invalid number"))
        })
}

fn value() -> impl Parser<char, Value, Error = Simple<char>> + Clone {
    string_literal()
        .map(Value::String)
        .or(number().map(Value::Number))
        .or(ident().map(|s| match s.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Ident(s),
        }))
}

fn spanned_value() -> impl Parser<char, Spanned<Value>, Error = Simple<char>> + Clone {
    value().map_with_span(Spanned::new)
}

fn setting() -> impl Parser<char, Spanned<Setting>, Error = Simple<char>> + Clone {
    spanned_ident()
        .then(just('.').ignore_then(spanned_ident()).repeated())
        .then_ignore(ws())
        .then_ignore(just('='))
        .then_ignore(ws())
        .then(spanned_value())
        .map(|((first, rest), value)| {
            let mut path = vec![first];
            path.extend(rest);
            Setting { path, value }
        })
        .map_with_span(Spanned::new)
        .then_ignore(ws())
        .then_ignore(just(';'))
        .then_ignore(ws())
}

fn init_block() -> impl Parser<char, Item, Error = Simple<char>> + Clone {
    just("on")
        .ignore_then(required_ws())
        .ignore_then(just("init"))
        .ignore_then(ws())
        .ignore_then(just('{'))
        .ignore_then(ws())
        .ignore_then(setting().repeated())
        .then_ignore(just('}'))
        .map(Item::Init)
}

fn prop() -> impl Parser<char, Spanned<Prop>, Error = Simple<char>> + Clone {
    spanned_ident()
        .then_ignore(ws())
        .then_ignore(just(':'))
        .then_ignore(ws())
        .then(spanned_value())
        .map(|(name, value)| Prop { name, value })
        .map_with_span(Spanned::new)
}

fn props() -> impl Parser<char, Vec<Spanned<Prop>>, Error = Simple<char>> + Clone {
    just('(')
        .ignore_then(ws())
        .ignore_then(prop().separated_by(just(',').padded_by(ws())).allow_trailing())
        .then_ignore(ws())
        .then_ignore(just(')'))
}

fn atom() -> impl Parser<char, Spanned<AtomDecl>, Error = Simple<char>> + Clone {
    let word = spanned_string_literal()
        .then_ignore(ws())
        .then(props().or_not())
        .map(|(text, props)| AtomDecl::Word {
            text,
            props: props.unwrap_or_default(),
        });
    let pause = just("pause").to(AtomDecl::Pause);

    word.or(pause)
        .map_with_span(Spanned::new)
        .then_ignore(ws())
        .then_ignore(just(';'))
        .then_ignore(ws())
}

fn line_block() -> impl Parser<char, Item, Error = Simple<char>> + Clone {
    just("line")
        .ignore_then(required_ws())
        .ignore_then(spanned_ident().or(spanned_string_literal()))
        .then_ignore(ws())
        .then_ignore(just('{'))
        .then_ignore(ws())
        .then(atom().repeated())
        .then_ignore(just('}'))
        .map(|(id, atoms)| Item::Line(LineDecl { id, atoms }))
}

fn script() -> impl Parser<char, Script, Error = Simple<char>> {
    ws().ignore_then(
        init_block()
            .or(line_block())
            .map_with_span(Spanned::new)
            .padded_by(ws())
            .repeated(),
    )
    .then_ignore(end())
    .map(|items| Script { items })
}

pub fn parser() -> impl Parser<char, Script, Error = Simple<char>> {
    script()
}

pub fn parse(source: &str) -> (Option<Script>, Vec<ParseError>) {
    let (result, errs) = parser().parse_recovery(source);

    let errors = errs
        .into_iter()
        .map(|e| {
            let span = e.span();
            let message = match e.reason() {
                chumsky::error::SimpleReason::Unexpected => {
                    let found = e
                        .found()
                        .map(|c| format!("'{c}'"))
                        .unwrap_or_else(|| "end of input".to_string());
                    let expected: Vec<_> = e
                        .expected()
                        .filter_map(|exp| exp.as_ref().map(|c| format!("'{c}'")))
                        .collect();
                    if expected.is_empty() {
                        format!("unexpected {found}")
                    } else {
                        format!("expected {}, found {}", expected.join(" or "), found)
                    }
                },
                chumsky::error::SimpleReason::Unclosed { span: _, delimiter } => {
                    format!("unclosed delimiter '{delimiter}'")
                },
                chumsky::error::SimpleReason::Custom(msg) => msg.clone(),
            };
            ParseError::new(span, message)
        })
        .collect();

    (result, errors)
}
