//! XML emission for token lists and parse trees.
//!
//! The parse-tree writer walks the syntax tree in pre-order, reconstructing
//! the terminal sequence from the node data; it never consults the token
//! stream. Output matches the course comparison format: two-space indents,
//! terminals as `<kind> value </kind>`, and a tag pair per non-terminal
//! (including empty `parameterList` / `expressionList`).

use crate::ast::*;
use crate::token::{SpannedToken, escape, escape_char};

/// Flat token listing for the `<Base>T.xml` output.
pub fn tokens_to_xml(tokens: &[SpannedToken]) -> String {
    let mut out = String::with_capacity(10 + tokens.len() * 40);
    out.push_str("<tokens>\n");
    for t in tokens {
        let tag = t.token.xml_tag();
        let value = t.token.xml_value();
        out.push_str(&format!("<{tag}> {value} </{tag}>\n"));
    }
    out.push_str("</tokens>\n");
    out
}

/// Parse-tree emission for the `<Base>.xml` output.
pub fn tree_to_xml(class: &Class) -> String {
    let mut writer = TreeWriter {
        out: String::with_capacity(4096),
        indent: 0,
    };
    writer.class(class);
    writer.out
}

struct TreeWriter {
    out: String,
    indent: usize,
}

impl TreeWriter {
    // -- low-level helpers ---------------------------------------------

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, tag: &str) {
        self.line(&format!("<{tag}>"));
        self.indent += 1;
    }

    fn close(&mut self, tag: &str) {
        self.indent -= 1;
        self.line(&format!("</{tag}>"));
    }

    fn terminal(&mut self, tag: &str, value: &str) {
        self.line(&format!("<{tag}> {value} </{tag}>"));
    }

    fn keyword(&mut self, text: &str) {
        self.terminal("keyword", text);
    }

    fn symbol(&mut self, c: char) {
        self.terminal("symbol", &escape_char(c));
    }

    fn identifier(&mut self, name: &str) {
        self.terminal("identifier", name);
    }

    fn ty(&mut self, ty: &Type) {
        match ty {
            Type::Int => self.keyword("int"),
            Type::Char => self.keyword("char"),
            Type::Boolean => self.keyword("boolean"),
            Type::Class(name) => self.identifier(name),
        }
    }

    fn name_list(&mut self, names: &[String]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.symbol(',');
            }
            self.identifier(name);
        }
    }

    // -- declarations ---------------------------------------------------

    fn class(&mut self, class: &Class) {
        self.open("class");
        self.keyword("class");
        self.identifier(&class.name);
        self.symbol('{');
        for dec in &class.var_decs {
            self.class_var_dec(dec);
        }
        for sub in &class.subroutines {
            self.subroutine_dec(sub);
        }
        self.symbol('}');
        self.close("class");
    }

    fn class_var_dec(&mut self, dec: &ClassVarDec) {
        self.open("classVarDec");
        self.keyword(dec.kind.as_str());
        self.ty(&dec.ty);
        self.name_list(&dec.names);
        self.symbol(';');
        self.close("classVarDec");
    }

    fn subroutine_dec(&mut self, sub: &SubroutineDec) {
        self.open("subroutineDec");
        self.keyword(sub.kind.as_str());
        match &sub.return_type {
            None => self.keyword("void"),
            Some(ty) => self.ty(ty),
        }
        self.identifier(&sub.name);
        self.symbol('(');
        self.parameter_list(&sub.params);
        self.symbol(')');
        self.subroutine_body(&sub.body);
        self.close("subroutineDec");
    }

    fn parameter_list(&mut self, params: &[Param]) {
        self.open("parameterList");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.symbol(',');
            }
            self.ty(&param.ty);
            self.identifier(&param.name);
        }
        self.close("parameterList");
    }

    fn subroutine_body(&mut self, body: &SubroutineBody) {
        self.open("subroutineBody");
        self.symbol('{');
        for dec in &body.var_decs {
            self.var_dec(dec);
        }
        self.statements(&body.statements);
        self.symbol('}');
        self.close("subroutineBody");
    }

    fn var_dec(&mut self, dec: &VarDec) {
        self.open("varDec");
        self.keyword("var");
        self.ty(&dec.ty);
        self.name_list(&dec.names);
        self.symbol(';');
        self.close("varDec");
    }

    // -- statements -----------------------------------------------------

    fn statements(&mut self, statements: &[Statement]) {
        self.open("statements");
        for statement in statements {
            self.statement(statement);
        }
        self.close("statements");
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Let { name, index, value } => {
                self.open("letStatement");
                self.keyword("let");
                self.identifier(name);
                if let Some(index) = index {
                    self.symbol('[');
                    self.expression(index);
                    self.symbol(']');
                }
                self.symbol('=');
                self.expression(value);
                self.symbol(';');
                self.close("letStatement");
            }
            Statement::If {
                condition,
                then_body,
                else_body,
            } => {
                self.open("ifStatement");
                self.keyword("if");
                self.symbol('(');
                self.expression(condition);
                self.symbol(')');
                self.symbol('{');
                self.statements(then_body);
                self.symbol('}');
                if let Some(body) = else_body {
                    self.keyword("else");
                    self.symbol('{');
                    self.statements(body);
                    self.symbol('}');
                }
                self.close("ifStatement");
            }
            Statement::While { condition, body } => {
                self.open("whileStatement");
                self.keyword("while");
                self.symbol('(');
                self.expression(condition);
                self.symbol(')');
                self.symbol('{');
                self.statements(body);
                self.symbol('}');
                self.close("whileStatement");
            }
            Statement::Do(call) => {
                self.open("doStatement");
                self.keyword("do");
                self.call(call);
                self.symbol(';');
                self.close("doStatement");
            }
            Statement::Return(value) => {
                self.open("returnStatement");
                self.keyword("return");
                if let Some(value) = value {
                    self.expression(value);
                }
                self.symbol(';');
                self.close("returnStatement");
            }
        }
    }

    // -- expressions ----------------------------------------------------

    fn expression(&mut self, expr: &Expression) {
        self.open("expression");
        self.term(&expr.first);
        for (op, term) in &expr.rest {
            self.symbol(op.as_char());
            self.term(term);
        }
        self.close("expression");
    }

    fn term(&mut self, term: &Term) {
        self.open("term");
        match term {
            Term::Int(n) => self.terminal("integerConstant", &n.to_string()),
            Term::Str(s) => self.terminal("stringConstant", &escape(s)),
            Term::Const(k) => self.keyword(k.as_str()),
            Term::Var(name) => self.identifier(name),
            Term::Index(name, index) => {
                self.identifier(name);
                self.symbol('[');
                self.expression(index);
                self.symbol(']');
            }
            Term::Call(call) => self.call(call),
            Term::Paren(expr) => {
                self.symbol('(');
                self.expression(expr);
                self.symbol(')');
            }
            Term::Unary(op, inner) => {
                self.symbol(op.as_char());
                self.term(inner);
            }
        }
        self.close("term");
    }

    /// A subroutine call has no tag of its own in the comparison format.
    fn call(&mut self, call: &SubroutineCall) {
        if let Some(receiver) = &call.receiver {
            self.identifier(receiver);
            self.symbol('.');
        }
        self.identifier(&call.name);
        self.symbol('(');
        self.open("expressionList");
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.symbol(',');
            }
            self.expression(arg);
        }
        self.close("expressionList");
        self.symbol(')');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn analyze(source: &str) -> (String, String) {
        let tokens = Lexer::new(source).tokenize().unwrap();
        let class = Parser::new(&tokens).parse().unwrap();
        (tokens_to_xml(&tokens), tree_to_xml(&class))
    }

    #[test]
    fn token_xml_is_flat() {
        let (token_xml, _) = analyze("class Main { }");
        assert_eq!(
            token_xml,
            "<tokens>\n\
             <keyword> class </keyword>\n\
             <identifier> Main </identifier>\n\
             <symbol> { </symbol>\n\
             <symbol> } </symbol>\n\
             </tokens>\n"
        );
    }

    #[test]
    fn minimal_class_tree() {
        let (_, tree) = analyze("class Main { function void main() { return; } }");
        let expected = "\
<class>
  <keyword> class </keyword>
  <identifier> Main </identifier>
  <symbol> { </symbol>
  <subroutineDec>
    <keyword> function </keyword>
    <keyword> void </keyword>
    <identifier> main </identifier>
    <symbol> ( </symbol>
    <parameterList>
    </parameterList>
    <symbol> ) </symbol>
    <subroutineBody>
      <symbol> { </symbol>
      <statements>
        <returnStatement>
          <keyword> return </keyword>
          <symbol> ; </symbol>
        </returnStatement>
      </statements>
      <symbol> } </symbol>
    </subroutineBody>
  </subroutineDec>
  <symbol> } </symbol>
</class>
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn operators_are_escaped() {
        let (token_xml, tree) = analyze(
            "class M { function void f() { if (x < (y & z)) { return; } return; } }",
        );
        assert!(token_xml.contains("<symbol> &lt; </symbol>"));
        assert!(token_xml.contains("<symbol> &amp; </symbol>"));
        assert!(tree.contains("<symbol> &lt; </symbol>"));
        assert!(tree.contains("<symbol> &amp; </symbol>"));
    }

    #[test]
    fn string_constants_lose_their_quotes() {
        let (token_xml, tree) =
            analyze("class M { function void f() { let s = \"a<b\"; return; } }");
        assert!(token_xml.contains("<stringConstant> a&lt;b </stringConstant>"));
        assert!(tree.contains("<stringConstant> a&lt;b </stringConstant>"));
        assert!(!tree.contains('"'));
    }

    #[test]
    fn expression_list_tags_even_when_empty() {
        let (_, tree) = analyze("class M { function void f() { do g(); return; } }");
        assert!(tree.contains("<expressionList>\n"));
        assert!(tree.contains("</expressionList>\n"));
    }

    #[test]
    fn every_term_is_tagged() {
        let (_, tree) = analyze(
            "class M { function void f() { let x = -a[1] + M.g(true, \"s\") * (z); return; } }",
        );
        // term tags: -a[1], a[1]'s index 1, M.g(..) with args true and "s",
        // (z) and inner z
        assert!(tree.matches("<term>").count() >= 7);
        assert_eq!(
            tree.matches("<term>").count(),
            tree.matches("</term>").count()
        );
    }

    #[test]
    fn array_access_inside_let() {
        let (_, tree) = analyze("class M { function void f() { let a[i] = 2; return; } }");
        let pos_open = tree.find("<letStatement>").unwrap();
        let pos_bracket = tree.find("<symbol> [ </symbol>").unwrap();
        assert!(pos_bracket > pos_open);
    }
}
