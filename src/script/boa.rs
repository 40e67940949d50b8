//! JavaScript engine backed by Boa
//!
//! Each call builds its own `Context`. Only the ECMAScript built-ins are
//! present: no console, filesystem, network or process bindings are
//! registered, so a script can read `input` and compute, nothing else.

use super::{prepare_script, ScriptEngine, ScriptLimits};
use crate::error::{ScriptError, ScriptPhase};
use boa_engine::{js_string, property::Attribute, Context, JsString, JsValue, Script, Source};
use tracing::debug;

/// Sandboxed JavaScript engine
#[derive(Debug, Clone, Default)]
pub struct BoaEngine {
    limits: ScriptLimits,
}

impl BoaEngine {
    pub fn new(limits: ScriptLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> ScriptLimits {
        self.limits
    }

    fn fresh_context(&self) -> Context {
        let mut context = Context::default();
        let limits = context.runtime_limits_mut();
        limits.set_loop_iteration_limit(self.limits.loop_iteration_limit);
        limits.set_recursion_limit(self.limits.recursion_limit);
        context
    }
}

impl ScriptEngine for BoaEngine {
    fn run(&self, script: &str, input: &str) -> Result<String, ScriptError> {
        let prepared = prepare_script(script);
        let mut context = self.fresh_context();

        context
            .register_global_property(js_string!("input"), JsString::from(input), Attribute::all())
            .map_err(|e| ScriptError::new(ScriptPhase::Compile, e.to_string()))?;

        let parsed = Script::parse(Source::from_bytes(prepared.as_str()), None, &mut context)
            .map_err(|e| ScriptError::new(ScriptPhase::Compile, e.to_string()))?;
        parsed
            .evaluate(&mut context)
            .map_err(|e| ScriptError::new(ScriptPhase::Compile, e.to_string()))?;

        // `let`/`const` bindings live in the global lexical environment, not on
        // the global object, so resolve the name the way the script itself would
        let process = context
            .eval(Source::from_bytes("process"))
            .map_err(|e| ScriptError::new(ScriptPhase::MissingProcess, e.to_string()))?;
        let Some(process) = process.as_callable() else {
            return Err(ScriptError::new(
                ScriptPhase::MissingProcess,
                "'process' is not a function",
            ));
        };

        let result = process
            .call(
                &JsValue::undefined(),
                &[JsValue::from(JsString::from(input))],
                &mut context,
            )
            .map_err(|e| ScriptError::new(ScriptPhase::Runtime, e.to_string()))?;

        let output = result
            .to_string(&mut context)
            .map_err(|e| ScriptError::new(ScriptPhase::Runtime, e.to_string()))?
            .to_std_string_escaped();

        debug!(input_len = input.len(), output_len = output.len(), "script finished");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str, input: &str) -> Result<String, ScriptError> {
        BoaEngine::default().run(script, input)
    }

    #[test]
    fn test_bare_statement_script() {
        assert_eq!(run("return input.toUpperCase();", "hi").unwrap(), "HI");
    }

    #[test]
    fn test_explicit_process_function() {
        let script = "function process(input) { return input.split('').reverse().join(''); }";
        assert_eq!(run(script, "abc").unwrap(), "cba");
    }

    #[test]
    fn test_arrow_process() {
        let script = "const process = (s) => s.length * 2;";
        assert_eq!(run(script, "abcd").unwrap(), "8");
    }

    #[test]
    fn test_lexical_process_bindings() {
        assert_eq!(run("let process = function (s) { return s + '?'; };", "x").unwrap(), "x?");
        assert_eq!(run("const process = s => s.toUpperCase();", "x").unwrap(), "X");
        assert_eq!(run("var process = (s) => s + '!';", "x").unwrap(), "x!");
    }

    #[test]
    fn test_member_assignment_named_process_gets_default_entry_point() {
        let script = "const handlers = {}; handlers.process = function (s) { return s + '!'; };";
        assert_eq!(run(script, "same").unwrap(), "same");
    }

    #[test]
    fn test_typeof_process_comparison_gets_default_entry_point() {
        let script = "const fallback = (s) => typeof process === 'undefined' ? s : s;";
        assert_eq!(run(script, "same").unwrap(), "same");
    }

    #[test]
    fn test_script_without_process_passes_input_through() {
        let script = "const shout = s => s + '!';";
        assert_eq!(run(script, "same").unwrap(), "same");
    }

    #[test]
    fn test_global_input_is_bound() {
        let script = "function process(ignored) { return input + '?'; }";
        assert_eq!(run(script, "why").unwrap(), "why?");
    }

    #[test]
    fn test_non_string_results_are_coerced() {
        assert_eq!(run("return 1 + 2;", "").unwrap(), "3");
        assert_eq!(run("return;", "").unwrap(), "undefined");
        assert_eq!(run("return [1, 2];", "").unwrap(), "1,2");
    }

    #[test]
    fn test_syntax_error_is_compile_phase() {
        let err = run("return input.toUpperCase(;", "hi").unwrap_err();
        assert_eq!(err.phase, ScriptPhase::Compile);
    }

    #[test]
    fn test_process_bound_to_non_function() {
        let err = run("var process = 42; function helper() {}", "hi").unwrap_err();
        assert_eq!(err.phase, ScriptPhase::MissingProcess);
    }

    #[test]
    fn test_throw_is_runtime_phase() {
        let err = run("throw new Error('boom');", "hi").unwrap_err();
        assert_eq!(err.phase, ScriptPhase::Runtime);
        assert!(err.message.contains("boom"));
    }

    #[test]
    fn test_infinite_loop_hits_budget() {
        let engine = BoaEngine::new(ScriptLimits {
            loop_iteration_limit: 1_000,
            ..ScriptLimits::default()
        });
        let err = engine.run("while (true) {} return input;", "x").unwrap_err();
        assert_eq!(err.phase, ScriptPhase::Runtime);
    }

    #[test]
    fn test_runaway_recursion_hits_budget() {
        let script = "function process(input) { return process(input); }";
        let err = run(script, "x").unwrap_err();
        assert_eq!(err.phase, ScriptPhase::Runtime);
    }

    #[test]
    fn test_no_state_leaks_between_runs() {
        let engine = BoaEngine::default();
        engine
            .run("globalThis.leaked = 'yes'; return input;", "a")
            .unwrap();
        let output = engine
            .run("return typeof globalThis.leaked;", "b")
            .unwrap();
        assert_eq!(output, "undefined");
    }

    #[test]
    fn test_host_capabilities_are_absent() {
        let output = run(
            "return [typeof require, typeof process.env, typeof console, typeof fetch].join(',');",
            "",
        );
        // `process` here is the wrapped function itself, so `process.env` is undefined
        assert_eq!(output.unwrap(), "undefined,undefined,undefined,undefined");
    }
}
