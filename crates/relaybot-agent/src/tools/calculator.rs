//! Calculator tool — arithmetic expression evaluation.
//!
//! A small recursive-descent evaluator over `+ - * / %` with parentheses and
//! unary minus. No `eval`, no surprises: anything outside that grammar is an
//! error the loop observes and recovers from.

use async_trait::async_trait;

use super::base::Tool;

/// Evaluates arithmetic expressions like `"21+21"` or `"(3 + 4) * 2.5"`.
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Evaluate an arithmetic expression. Input is the expression itself, e.g. '2 + 2' or '(3 + 4) * 2.5'."
    }

    async fn invoke(&self, input: &str) -> anyhow::Result<String> {
        let value = evaluate(input)?;
        // Integers print without a trailing ".0"
        if value.fract() == 0.0 && value.abs() < 1e15 {
            Ok(format!("{}", value as i64))
        } else {
            Ok(format!("{value}"))
        }
    }
}

/// Evaluate an expression string to a float.
fn evaluate(input: &str) -> anyhow::Result<f64> {
    let mut parser = Parser {
        chars: input.chars().collect(),
        pos: 0,
    };
    let value = parser.expression()?;
    parser.skip_whitespace();
    if parser.pos != parser.chars.len() {
        anyhow::bail!(
            "unexpected character '{}' at position {}",
            parser.chars[parser.pos],
            parser.pos
        );
    }
    Ok(value)
}

/// Grammar:
///   expression := term (('+' | '-') term)*
///   term       := factor (('*' | '/' | '%') factor)*
///   factor     := '-' factor | '(' expression ')' | number
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn expression(&mut self) -> anyhow::Result<f64> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('+') => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some('-') => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> anyhow::Result<f64> {
        let mut value = self.factor()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some('/') => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        anyhow::bail!("division by zero");
                    }
                    value /= divisor;
                }
                Some('%') => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        anyhow::bail!("division by zero");
                    }
                    value %= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> anyhow::Result<f64> {
        self.skip_whitespace();
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            Some('(') => {
                self.pos += 1;
                let value = self.expression()?;
                self.skip_whitespace();
                if self.peek() != Some(')') {
                    anyhow::bail!("missing closing parenthesis");
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => anyhow::bail!("unexpected character '{c}'"),
            None => anyhow::bail!("unexpected end of expression"),
        }
    }

    fn number(&mut self) -> anyhow::Result<f64> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map_err(|_| anyhow::anyhow!("invalid number '{text}'"))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
