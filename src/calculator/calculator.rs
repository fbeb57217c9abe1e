use crate::calculator::format::format_result;
use crate::calculator::parser::{evaluate, CalcError};
use log::debug;
use serde::Serialize;
use std::f64::consts::{E, PI};
use std::time::{Duration, Instant};

pub const ERROR_DISPLAY: &str = "Error";
pub const ERROR_REVERT: Duration = Duration::from_millis(900);

const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Operator(char),
    Dot,
    Bracket,
    Equals,
    Clear,
    Backspace,
}

impl Key {
    /// Accepts both keypad labels and keyboard key names.
    pub fn parse(key: &str) -> Option<Key> {
        match key {
            "=" | "Enter" => Some(Key::Equals),
            "C" | "Escape" => Some(Key::Clear),
            "⌫" | "Backspace" | "Delete" => Some(Key::Backspace),
            "()" | "(" | ")" => Some(Key::Bracket),
            "." => Some(Key::Dot),
            "×" => Some(Key::Operator('*')),
            "÷" => Some(Key::Operator('/')),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() => Some(Key::Digit(c)),
                    (Some(c), None) if OPERATORS.contains(&c) => Some(Key::Operator(c)),
                    _ => None,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatorView {
    pub expression: String,
    pub display: String,
    pub preview: Option<String>,
}

/// Keypad state: one expression string plus the transient error flag.
#[derive(Debug, Clone)]
pub struct Calculator {
    expr: String,
    just_evaluated: bool,
    error_since: Option<Instant>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Calculator {
            expr: String::from("0"),
            just_evaluated: false,
            error_since: None,
        }
    }

    pub fn expression(&self) -> &str {
        &self.expr
    }

    /// What the screen shows at `now`: `Error` for a short while after a
    /// failed evaluation, the expression otherwise.
    pub fn display(&self, now: Instant) -> String {
        match self.error_since {
            Some(since) if now.duration_since(since) < ERROR_REVERT => ERROR_DISPLAY.to_string(),
            _ => self.expr.replace('*', "×").replace('/', "÷"),
        }
    }

    pub fn preview(&self) -> Option<String> {
        let value = evaluate(&self.expr).ok()?;
        let formatted = format_result(value);

        if formatted != self.expr {
            Some(format!("= {formatted}"))
        } else {
            None
        }
    }

    pub fn view(&self, now: Instant) -> CalculatorView {
        let display = self.display(now);
        let preview = if display == ERROR_DISPLAY {
            None
        } else {
            self.preview()
        };

        CalculatorView {
            expression: self.expr.clone(),
            display,
            preview,
        }
    }

    pub fn press(&mut self, key: &str, now: Instant) -> Result<(), CalcError> {
        let key = Key::parse(key).ok_or_else(|| CalcError::UnknownKey(key.to_string()))?;
        self.input(key, now);

        Ok(())
    }

    pub fn input(&mut self, key: Key, now: Instant) {
        self.error_since = None;

        if self.just_evaluated
            && !matches!(key, Key::Backspace | Key::Clear | Key::Operator(_))
        {
            self.expr = String::from("0");
        }
        self.just_evaluated = false;

        match key {
            Key::Clear => self.expr = String::from("0"),
            Key::Backspace => {
                if self.expr.chars().count() > 1 {
                    self.expr.pop();
                } else {
                    self.expr = String::from("0");
                }
            }
            Key::Equals => self.evaluate(now),
            Key::Bracket => self.insert_bracket(),
            Key::Dot => self.insert_dot(),
            Key::Operator(op) => self.insert_operator(op),
            Key::Digit(d) => {
                if self.expr == "0" {
                    self.expr = d.to_string();
                } else {
                    self.expr.push(d);
                }
            }
        }
    }

    fn evaluate(&mut self, now: Instant) {
        match evaluate(&self.expr) {
            Ok(value) => {
                self.expr = format_result(value);
                self.just_evaluated = true;
            }
            Err(e) => self.fail(e, now),
        }
    }

    fn fail(&mut self, error: CalcError, now: Instant) {
        debug!("Calculator error on '{}': {}", self.expr, error);
        self.expr = String::from("0");
        self.error_since = Some(now);
    }

    fn insert_operator(&mut self, op: char) {
        if self.expr == "0" && op == '-' {
            self.expr = String::from("-");
            return;
        }

        if self.expr.ends_with(OPERATORS) {
            self.expr.pop();
        }
        self.expr.push(op);
    }

    fn insert_bracket(&mut self) {
        if self.expr == "0" {
            self.expr = String::from("(");
            return;
        }

        let opens = self.expr.matches('(').count();
        let closes = self.expr.matches(')').count();
        let last = self.expr.chars().last();
        let add_open = opens == closes
            || last.is_some_and(|c| OPERATORS.contains(&c) || c == '(');

        self.expr.push(if add_open { '(' } else { ')' });
    }

    fn insert_dot(&mut self) {
        let current_number = self
            .expr
            .rsplit(|c: char| OPERATORS.contains(&c) || c == '(' || c == ')')
            .next()
            .unwrap_or("");

        if !current_number.contains('.') {
            self.expr.push('.');
        }
    }

    /// Scientific panel. Functions act on the value of the whole expression.
    pub fn apply_function(&mut self, name: &str, now: Instant) -> Result<(), CalcError> {
        self.error_since = None;

        match name {
            "pow" => {
                self.expr.push_str("**");
                self.just_evaluated = false;
                return Ok(());
            }
            "pi" | "e" => {
                let constant = format_result(if name == "pi" { PI } else { E });
                if self.expr == "0" {
                    self.expr = constant;
                } else {
                    self.expr.push_str(&constant);
                }
                self.just_evaluated = false;
                return Ok(());
            }
            _ => {}
        }

        let function: fn(f64) -> f64 = match name {
            "sin" => |n| n.to_radians().sin(),
            "cos" => |n| n.to_radians().cos(),
            "tan" => |n| n.to_radians().tan(),
            "log" => f64::log10,
            "ln" => f64::ln,
            "sqrt" => f64::sqrt,
            "sq" => |n| n.powi(2),
            "cb" => |n| n.powi(3),
            "inv" => |n| 1.0 / n,
            _ => return Err(CalcError::UnknownFunction(name.to_string())),
        };

        let result = evaluate(&self.expr).map(function).and_then(|value| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(CalcError::NotFinite)
            }
        });

        match result {
            Ok(value) => {
                self.expr = format_result(value);
                self.just_evaluated = true;
            }
            Err(e) => self.fail(e, now),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_all(calculator: &mut Calculator, keys: &[&str], now: Instant) {
        for key in keys {
            calculator.press(key, now).unwrap();
        }
    }

    #[test]
    fn test_addition() {
        let now = Instant::now();
        let mut calculator = Calculator::new();

        press_all(&mut calculator, &["1", "2", "+", "3", "="], now);

        assert_eq!(calculator.display(now), "15");
    }

    #[test]
    fn test_division_by_zero_reverts() {
        let now = Instant::now();
        let mut calculator = Calculator::new();

        press_all(&mut calculator, &["5", "/", "0", "="], now);

        assert_eq!(calculator.display(now), "Error");
        assert_eq!(calculator.display(now + Duration::from_millis(500)), "Error");
        assert_eq!(calculator.display(now + ERROR_REVERT), "0");
    }

    #[test]
    fn test_operators_collapse() {
        let now = Instant::now();
        let mut calculator = Calculator::new();

        press_all(&mut calculator, &["7", "+", "*", "-", "2"], now);

        assert_eq!(calculator.expression(), "7-2");
    }

    #[test]
    fn test_leading_minus() {
        let now = Instant::now();
        let mut calculator = Calculator::new();

        press_all(&mut calculator, &["-", "4", "*", "2", "="], now);

        assert_eq!(calculator.expression(), "-8");
    }

    #[test]
    fn test_single_decimal_point_per_number() {
        let now = Instant::now();
        let mut calculator = Calculator::new();

        press_all(&mut calculator, &["1", ".", "5", ".", "+", "2", ".", "."], now);

        assert_eq!(calculator.expression(), "1.5+2.");
    }

    #[test]
    fn test_brackets_toggle() {
        let now = Instant::now();
        let mut calculator = Calculator::new();

        press_all(&mut calculator, &["()", "2", "+", "()", "3", "()", "()"], now);
        assert_eq!(calculator.expression(), "(2+(3))");

        press_all(&mut calculator, &["*", "()", "4", "()", "="], now);
        assert_eq!(calculator.expression(), "20");
    }

    #[test]
    fn test_digit_after_result_starts_over() {
        let now = Instant::now();
        let mut calculator = Calculator::new();

        press_all(&mut calculator, &["2", "*", "3", "=", "4"], now);
        assert_eq!(calculator.expression(), "4");

        press_all(&mut calculator, &["*", "3", "=", "+", "1"], now);
        assert_eq!(calculator.expression(), "12+1");
    }

    #[test]
    fn test_backspace_and_clear() {
        let now = Instant::now();
        let mut calculator = Calculator::new();

        press_all(&mut calculator, &["9", "8", "Backspace"], now);
        assert_eq!(calculator.expression(), "9");

        press_all(&mut calculator, &["⌫"], now);
        assert_eq!(calculator.expression(), "0");

        press_all(&mut calculator, &["5", "5", "C"], now);
        assert_eq!(calculator.expression(), "0");
    }

    #[test]
    fn test_preview() {
        let now = Instant::now();
        let mut calculator = Calculator::new();

        press_all(&mut calculator, &["1", "/", "4"], now);
        assert_eq!(calculator.preview(), Some(String::from("= 0.25")));
        assert_eq!(calculator.view(now).display, "1÷4");

        press_all(&mut calculator, &["+"], now);
        assert_eq!(calculator.preview(), None);
    }

    #[test]
    fn test_unknown_key() {
        let mut calculator = Calculator::new();

        assert_eq!(
            calculator.press("x", Instant::now()),
            Err(CalcError::UnknownKey(String::from("x")))
        );
    }

    #[test]
    fn test_scientific_functions() {
        let now = Instant::now();
        let mut calculator = Calculator::new();

        press_all(&mut calculator, &["1", "6"], now);
        calculator.apply_function("sqrt", now).unwrap();
        assert_eq!(calculator.expression(), "4");

        calculator.apply_function("sq", now).unwrap();
        assert_eq!(calculator.expression(), "16");

        press_all(&mut calculator, &["C", "3", "0"], now);
        calculator.apply_function("sin", now).unwrap();
        assert_eq!(calculator.expression(), "0.5");

        press_all(&mut calculator, &["C", "2"], now);
        calculator.apply_function("pow", now).unwrap();
        press_all(&mut calculator, &["1", "0", "="], now);
        assert_eq!(calculator.expression(), "1024");

        press_all(&mut calculator, &["C"], now);
        calculator.apply_function("pi", now).unwrap();
        assert_eq!(calculator.expression(), "3.141592654");

        press_all(&mut calculator, &["C", "2", "*", "3", "="], now);
        calculator.apply_function("e", now).unwrap();
        assert_eq!(calculator.expression(), "62.718281828");

        press_all(&mut calculator, &["C"], now);
        calculator.apply_function("inv", now).unwrap();
        assert_eq!(calculator.display(now), "Error");

        assert!(calculator.apply_function("cosh", now).is_err());
    }
}
