use mumble::{Context, Evaluation, Scalar, evaluate};

fn run(source: &str) -> Evaluation {
    evaluate(source)
}

fn assert_output(source: &str, expected: &str) {
    let result = run(source);
    assert!(result.errors.is_empty(),
            "unexpected errors for {source:?}: {:?}",
            result.errors);
    assert_eq!(result.output, expected, "wrong output for {source:?}");
}

fn assert_error(source: &str, fragment: &str) -> Evaluation {
    let result = run(source);
    assert!(result.errors.iter().any(|error| error.message.contains(fragment)),
            "expected an error containing {fragment:?} for {source:?}, got {:?}",
            result.errors);
    result
}

#[test]
fn operators_fold_left_to_right() {
    assert_output(" w 3+4*3", "21");
    assert_output(" w 3+(4*3)", "15");
    assert_output(" w 10-2-3", "5");
    assert_output(" w 2**10", "1024");
}

#[test]
fn division_family() {
    assert_output(" w 5/2", "2.5");
    assert_output(" w 5\\2", "2");
    assert_output(" w 5#2", "1");
    assert_output(" w -5#2", "-1");
    assert_output(" w -5\\2", "-3");
}

#[test]
fn string_number_polymorphism() {
    assert_output(" w \"a\"_\"b\"", "ab");
    assert_output(" w 1+\"2abc\"", "3");
    assert_output(" w \"\"+1", "1");
    assert_output(" w 1_2", "12");
}

#[test]
fn comparisons() {
    assert_output(" w 1=\"1\"", "1");
    assert_output(" w \"1.0\"=1", "0");
    assert_output(" w 2<10", "1");
    assert_output(" w \"2\"<\"10\"", "1");
    assert_output(" w 2'>1", "0");
    assert_output(" w 1'=2", "1");
}

#[test]
fn logic_and_unary() {
    assert_output(" w 1&0", "0");
    assert_output(" w 1!0", "1");
    assert_output(" w '0", "1");
    assert_output(" w ''5", "1");
    assert_output(" w 3+-2", "1");
    assert_output(" w -5+1", "-4");
}

#[test]
fn write_formatters() {
    assert_output(" w !,\"Hello\"", "\nHello");
    assert_output(" w \"ab\",?5,\"c\"", "ab   c");
    assert_output(" w \"abcdef\",?3,\"g\"", "abcdefg");
    assert_output(" w \"junk\",#,\"clean\"", "clean");
}

#[test]
fn command_names_match_by_prefix() {
    assert_output(" wRIte !,\"Hello, world\"", "\nHello, world");
    assert_output(" WRITE \"x\"", "x");
    assert_output(" s a=2 w a", "2");
}

#[test]
fn postconditionals_gate_commands() {
    assert_output(" w:0 \"a\" w:1 \"b\"", "b");
    assert_output(" s x=5 w:x>3 \"big\"", "big");
}

#[test]
fn for_counts_through_its_range() {
    assert_output(" f i=1:1:5 w !,\"i: \",i",
                  "\ni: 1\ni: 2\ni: 3\ni: 4\ni: 5");
    assert_output(" f i=5:-1:1 w i", "54321");
    assert_output(" f i=1,5,9 w i", "159");
    assert_output(" f i=1:2:6 w i", "135");
}

#[test]
fn open_ended_for_stops_on_quit() {
    assert_output(" f i=1:1 q:i>3  w i", "123");
    assert_output(" s n=0 f  s n=n+1 q:n>2  w n", "12");
}

#[test]
fn for_single_expression_keeps_strings() {
    assert_output(" f x=\"abc\" w x", "abc");
}

#[test]
fn arrays_iterate_in_collation_order() {
    assert_output(concat!(" s arr(1)=\"a\",arr(2)=\"c\",arr(10)=\"b\"\n",
                          " s k=$O(arr(\"\"))\n",
                          " f  q:k=\"\"  w arr(k) s k=$O(arr(k))"),
                  "acb");
}

#[test]
fn reverse_iteration_mirrors_forward() {
    assert_output(concat!(" s arr(1)=\"a\",arr(2)=\"c\",arr(10)=\"b\"\n",
                          " s k=$O(arr(\"\"),-1)\n",
                          " f  q:k=\"\"  w arr(k) s k=$O(arr(k),-1)"),
                  "bca");
}

#[test]
fn order_returns_empty_off_the_ends() {
    assert_output(" s a(1)=1 w \"[\",$O(a(1)),\"]\"", "[]");
    assert_output(" w \"[\",$O(missing(\"\")),\"]\"", "[]");
}

#[test]
fn kill_removes_subtrees() {
    assert_output(concat!(" s a(1)=1,a(2)=2\n", " k a(1)\n", " w $O(a(\"\"))"),
                  "2");
    assert_output(concat!(" s a(1,1)=1,a(1,2)=2,a(2)=3\n",
                          " k a(1)\n",
                          " w $O(a(\"\"))"),
                  "2");
}

#[test]
fn kill_without_arguments_clears_locals() {
    assert_output(" s x=5 k  w \"[\",x,\"]\"", "[]");
}

#[test]
fn merge_copies_and_preserves() {
    assert_output(concat!(" s dst(\"a\")=1,dst(\"b\")=2,dst(\"c\")=3\n",
                          " s src(\"c\")=4,src(\"d\")=5\n",
                          " m dst=src\n",
                          " s k=$O(dst(\"\"))\n",
                          " f  q:k=\"\"  w k,\"=\",dst(k),\" \" s k=$O(dst(k))"),
                  "a=1 b=2 c=4 d=5 ");
}

#[test]
fn merge_keeps_deep_destination_nodes() {
    assert_output(concat!(" s dst(\"c\",\"deep\")=9\n",
                          " s src(\"c\")=4\n",
                          " m dst=src\n",
                          " w dst(\"c\"),\"/\",dst(\"c\",\"deep\")"),
                  "4/9");
}

#[test]
fn merge_rejects_overlap() {
    assert_error(" s a(1)=1 m a=a(1)", "overlapping");
    assert_error(" s a(1,2)=3 m a(1)=a(1,2)", "overlapping");
    // Same root, disjoint paths: allowed.
    assert_output(" s a(1)=1,a(2,\"x\")=2 m a(1)=a(2) w a(1,\"x\")", "2");
}

#[test]
fn extract_assignment_splices() {
    assert_output(concat!(" s string=\"Hello, world!\"\n",
                          " s $E(string,3,5)=\"110\"\n",
                          " w string"),
                  "He110, world!");
    assert_output(" s x=\"abc\" s $E(x,2)=\"Z\" w x", "aZc");
    assert_output(" s x=\"abc\" s $E(x)=\"Z\" w x", "Zbc");
}

#[test]
fn select_takes_the_first_true_arm() {
    assert_output(" w $S(0:\"a\",1&1:\"b\",1!1:\"c\")", "b");
    assert_output(" w $S(0:1,0:2,1:\"last\")", "last");
}

#[test]
fn select_with_no_true_arm_is_an_error() {
    let result = assert_error(" w \"x\" w $S(0:\"a\")",
                              "All select conditions were false");
    assert_eq!(result.output, "x");
}

#[test]
fn string_builtins() {
    assert_output(" w $L(\"hello\")", "5");
    assert_output(" w $L(\"\")", "0");
    assert_output(" w $E(\"hello\")", "h");
    assert_output(" w $E(\"hello\",2)", "e");
    assert_output(" w $E(\"hello\",2,4)", "ell");
    assert_output(" w $E(\"hello\",1,$L(\"hello\"))", "hello");
    assert_output(" w $F(\"banana\",\"an\")", "4");
    assert_output(" w $F(\"banana\",\"an\",4)", "6");
    assert_output(" w $F(\"banana\",\"x\")", "0");
    assert_output(" w $F(\"banana\",\"\",5)", "1");
    assert_output(" w $A(\"A\")", "65");
    assert_output(" w $A(\"\")", "-1");
    assert_output(" w $C(66)", "B");
    assert_output(" w $C(65)_$C(98)", "Ab");
}

#[test]
fn blocks_run_between_the_surrounding_commands() {
    assert_output(concat!(" w \"1\" d  w \"4\"\n",
                          " . w \"2\"\n",
                          " . w \"3\"\n",
                          " w \"5\""),
                  "12345");
}

#[test]
fn blocks_nest() {
    assert_output(concat!(" d  w \"e\"\n",
                          " . w \"a\" d  w \"c\"\n",
                          " . . w \"b\"\n",
                          " . w \"d\""),
                  "abcde");
}

#[test]
fn quit_unwinds_only_the_block() {
    assert_output(concat!(" d  w \"b\"\n",
                          " . w \"a\" q\n",
                          " . w \"x\"\n",
                          " w \"c\""),
                  "abc");
}

#[test]
fn blank_lines_do_not_end_blocks() {
    assert_output(concat!(" w \"1\" d  w \"3\"\n",
                          "\n",
                          " . w \"2\"\n",
                          "\n",
                          " w \"4\""),
                  "1234");
}

#[test]
fn comments_are_ignored() {
    assert_output(" w \"a\" ; trailing comment", "a");
    assert_output(concat!("; a full-line comment\n", " w \"b\""), "b");
}

#[test]
fn tags_return_values() {
    assert_output(concat!(" w $$double(4)\n", " q\n", "double(n) q n*2"), "8");
}

#[test]
fn tags_fall_through_without_quit() {
    assert_output(concat!("start w \"a\" d mid w \"c\" q\n", "mid w \"b\" q"),
                  "abc");
}

#[test]
fn conditional_returns_collect_inside_inline_bodies() {
    assert_output(concat!(" w $$abs(-3),\"/\",$$abs(5)\n",
                          " q\n",
                          "abs(n) i n<0 q -n\n",
                          " q n"),
                  "3/5");
}

#[test]
fn missing_arguments_bind_empty_extras_drop() {
    assert_output(concat!(" w $$pair(1),\"-\",$$pair(1,2,3)\n",
                          " q\n",
                          "pair(a,b) q a_\"/\"_b"),
                  "1/-1/2");
}

#[test]
fn reference_arguments_write_through() {
    assert_output(concat!(" s x=1\n",
                          " d bump(.x)\n",
                          " w x\n",
                          " q\n",
                          "bump(v) s v=v+1 q"),
                  "2");
}

#[test]
fn reference_arguments_pass_along() {
    assert_output(concat!(" s x=1\n",
                          " d outer(.x)\n",
                          " w x\n",
                          " q\n",
                          "outer(a) d inner(.a) q\n",
                          "inner(b) s b=b+10 q"),
                  "11");
}

#[test]
fn reference_to_missing_variable_is_an_error() {
    assert_error(concat!(" d f(.y)\n", " q\n", "f(a) q"),
                 "undefined variable 'y'");
}

#[test]
fn new_scopes_names_until_the_tag_returns() {
    assert_output(concat!(" s x=1\n", " d sub\n", " w x\n", " q\n",
                          "sub n x s x=9 q"),
                  "1");
}

#[test]
fn paramless_tags_share_the_caller_scope() {
    assert_output(concat!(" s x=1\n", " d sub\n", " w x\n", " q\n",
                          "sub s x=9 q"),
                  "9");
}

#[test]
fn if_records_test_and_else_reads_it() {
    assert_output(concat!(" s x=3\n", " i x>2 w \"big\"\n", " e  w \"small\""),
                  "big");
    assert_output(concat!(" s x=1\n", " i x>2 w \"big\"\n", " e  w \"small\""),
                  "small");
    assert_output(concat!(" i 0 w \"no\"\n", " w $T"), "0");
    assert_output(concat!(" i 1,2,3 w \"yes \"\n", " w $T"), "yes 1");
}

#[test]
fn test_flag_lives_in_the_global_frame() {
    assert_output(concat!(" i 1 w \"\"\n",
                          " d flip\n",
                          " e  w \"flipped\"\n",
                          " q\n",
                          "flip(z) i 0 q"),
                  "flipped");
}

#[test]
fn halt_ends_everything() {
    assert_output(" w \"a\" h  w \"b\"", "a");
    assert_output(concat!(" d deep\n", " w \"never\"\n", " q\n",
                          "deep w \"a\" h  q"),
                  "a");
}

#[test]
fn self_values_survive_promotion() {
    assert_output(" s x=5,x(1)=\"a\" w x,\"-\",x(1)", "5-a");
    assert_output(" s y(1)=1 w \"[\",y,\"]\"", "[]");
}

#[test]
fn empty_subscripts_cannot_be_written() {
    assert_error(" s a(\"\")=1", "Subscripts cannot be empty");
}

#[test]
fn runtime_errors_keep_partial_output() {
    let result = assert_error(" w \"a\" w 1/0", "Division by zero");
    assert_eq!(result.output, "a");
    assert_error(" w 1\\0", "Division by zero");
    assert_error(" w 1#0", "Division by zero");
}

#[test]
fn unknown_names_are_reported() {
    assert_error(" d nope", "Unknown tag 'nope'");
    assert_error(" x 1", "Unknown command 'x'");
    assert_error(" w $Z(1)", "Unknown builtin '$Z'");
}

#[test]
fn order_direction_is_checked() {
    assert_error(" s a(1)=1 w $O(a(1),2)", "must be 1 or -1");
}

#[test]
fn builtin_arity_is_checked_at_parse_time() {
    assert_error(" w $L(\"a\",\"b\")", "Wrong number of arguments");
    assert_error(" w $F(\"a\")", "Wrong number of arguments");
    assert_error(" w $E(1,2,3,4)", "Wrong number of arguments");
}

#[test]
fn runaway_recursion_is_an_error() {
    assert_error(concat!(" d spin\n", " q\n", "spin d spin\n", " q"),
                 "Too many nested tag calls");
}

#[test]
fn a_command_at_column_zero_is_a_tag() {
    let result = run("w 1");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].line, 0);
    assert_eq!(result.errors[0].column, 2);
    assert_eq!(result.errors[0].message, "Expected command name");
}

#[test]
fn arguments_cannot_contain_inner_whitespace() {
    let result = run(" w 3 + 4 - 3");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].line, 0);
    assert_eq!(result.errors[0].column, 5);
    assert_eq!(result.errors[0].message, "Expected command name");
}

#[test]
fn parse_errors_recover_at_the_next_line() {
    let result = run(concat!(" w 3 +\n", " w \"still here\""));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.output, "3still here");
}

#[test]
fn evaluation_is_total_on_junk() {
    for source in ["", "\n\n", " w", " w \"unterminated", "((((", " . . .",
                   "tag(", " s =3", " f i=", "\u{1F980} crab"]
    {
        let _ = run(source);
    }
}

#[test]
fn seeded_random_is_reproducible_and_bounded() {
    let source = " f i=1:1:20 w $R(9),\",\"";

    let mut first = Context::with_seed(7);
    let mut second = Context::with_seed(7);
    let a = first.evaluate(source);
    let b = second.evaluate(source);

    assert!(a.errors.is_empty());
    assert_eq!(a.output, b.output);
    for drawn in a.output.split_terminator(',') {
        let value: f64 = drawn.parse().unwrap();
        assert!((0.0..=9.0).contains(&value), "out of range: {value}");
    }
}

#[test]
fn random_bounds_are_checked() {
    assert_output(" w $R(0)", "0");
    assert_error(" w $R(-1)", "non-negative");
}

#[test]
fn host_functions_are_callable() {
    let mut context = Context::with_seed(0);
    context.register_host("greet", |args| {
               let name = args.first()
                              .map(|value| value.as_scalar().as_text())
                              .unwrap_or_default();
               Some(Scalar::from(format!("hi {name}")))
           });

    let result = context.evaluate(" w $$greet(\"bob\")");
    assert!(result.errors.is_empty());
    assert_eq!(result.output, "hi bob");

    // Statement form discards the return value.
    let result = context.evaluate(" d greet(\"ann\") w \"done\"");
    assert!(result.errors.is_empty());
    assert_eq!(result.output, "done");
}

#[test]
fn program_tags_shadow_host_functions() {
    let mut context = Context::with_seed(0);
    context.register_host("name", |_| Some(Scalar::from("host")));

    let result = context.evaluate(concat!(" w $$name()\n", " q\n", "name() q \"tag\""));
    assert!(result.errors.is_empty());
    assert_eq!(result.output, "tag");
}
