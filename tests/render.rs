use abacus::interpreter::{Interpreter, value::core::Value};
use pretty_assertions::assert_eq;

fn assert_round_trip(src: &str) {
    let interpreter = Interpreter::new();
    let tree = interpreter.parse(src)
                          .unwrap_or_else(|e| panic!("'{src}' failed to parse: {e}"));
    let text = interpreter.render(&tree);
    let reparsed = interpreter.parse(&text)
                              .unwrap_or_else(|e| panic!("rendering '{text}' of '{src}' failed to parse: {e}"));
    assert_eq!(interpreter.evaluate(&reparsed).unwrap(),
               interpreter.evaluate(&tree).unwrap(),
               "'{src}' rendered as '{text}'");
}

#[test]
fn expressions_round_trip() {
    for src in ["(1+2)*-3",
                "2^-1",
                "-2^2",
                "-(1+2)",
                "3 - (2 - 1)",
                "2^3^2",
                "<1,-2;3,4> * 2",
                "(1+2i)*3",
                "(1-2i)*i",
                "[5km]*2",
                "[3m]/[2s] + [1m]/[1s]",
                "sin(pi/2)+3%2",
                "max(1, 5, 3) == 5",
                "\"ab\" + \"c\"",
                "0x1f + [11]_2",
                "run((a,b)=>a*b, 3, 4)",
                "run(n=>n, 7) < 8"]
    {
        assert_round_trip(src);
    }
}

#[test]
fn operators_render_with_parentheses() {
    let interpreter = Interpreter::new();
    let render = |src: &str| interpreter.render(&interpreter.parse(src).unwrap());
    assert_eq!(render("(1 + 2) * -3"), "(1+2)*(-3)");
    assert_eq!(render("1 + 2 * 3"), "1+(2*3)");
    assert_eq!(render("-(1 + 2)"), "-(1+2)");
    assert_eq!(render("<1, 2; 3, 4>"), "<1,2;3,4>");
    assert_eq!(render("\"text\""), "\"text\"");
    assert_eq!(render("run(n => n + 1, 2)"), "run(((n)=>n+1),2)");
}

#[test]
fn functions_render_as_definitions() {
    let mut interpreter = Interpreter::new();
    interpreter.define_function("f", &["x"], "x^2 + 1").unwrap();
    interpreter.define_function("g", &["n"], "{c=0;while(c<n){c=c+1};return c}")
               .unwrap();
    assert_eq!(interpreter.render_function("f").unwrap(), "f(x) = (x^2)+1");
    assert_eq!(interpreter.render_function("g").unwrap(),
               "g(n) = {c=0;while(c<n){c=c+1};return c}");
    assert_eq!(interpreter.render_function("missing"), None);
}

#[test]
fn functions_round_trip() {
    let cases: [(&str, &[&str], &str, &str); 7] =
        [("f", &["x"], "x^2 + 1", "f(3)"),
         ("count", &["n"], "{c=0;while(c<n){c=c+1};return c}", "count(4)"),
         ("sign",
          &["x"],
          "{if(x<0){return -1};else if(x==0){return 0};else{return 1}}",
          "sign(-2) + 10*sign(0) + 100*sign(5)"),
         ("odds",
          &["n"],
          "{i=0;t=0;while(i<n){i=i+1;if(i%2==0) continue;t=t+i};return t}",
          "odds(7)"),
         ("scaler", &["x"], "{k=2*x; return n=>n*k}", "run(scaler(3), 5)"),
         ("first", &["v"], "{i=0;while(1){if(get(v,i,0)>2){break};i=i+1};return i}", "first(<1,2,3,4>)"),
         ("reuse", &["x"], "{a=x;if(a>0){b=2*a;a=b};c=a+1;return c}", "reuse(3)")];

    for (name, params, body, call) in cases {
        let mut interpreter = Interpreter::new();
        interpreter.define_function(name, params, body).unwrap();
        let before = interpreter.evaluate_str(call).unwrap();

        let rendered = interpreter.render_function(name).unwrap();
        interpreter.execute(&rendered)
                   .unwrap_or_else(|e| panic!("'{rendered}' failed to parse: {e}"));
        let after = interpreter.evaluate_str(call).unwrap();
        assert_eq!(after, before, "{rendered}");
    }
}

#[test]
fn globals_render_by_name() {
    let mut interpreter = Interpreter::new();
    interpreter.set_variable("rate", Value::from(0.5)).unwrap();
    let tree = interpreter.parse("rate * 4").unwrap();
    assert_eq!(interpreter.render(&tree), "rate*4");
}
