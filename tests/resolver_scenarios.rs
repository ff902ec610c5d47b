//! End-to-end resolution scenarios against the `NormalHandler` fixture.

mod common;

use common::*;
use route_expressions::{
    DefaultValuePolicy, DispatchTarget, EvaluationError, Expr, ExpressionRouteResolver,
    InMemoryDescriptorProvider, Invocation, MethodIdentity, ParameterInfo, ResolveError,
    ResolverConfig, RouteHandler,
};
use serde_json::json;
use std::sync::Arc;

fn resolver() -> ExpressionRouteResolver {
    ExpressionRouteResolver::new(normal_provider())
}

#[test]
fn test_action_without_parameters() {
    let route = resolver()
        .resolve(&Invocation::<NormalHandler>::call(action_without_parameters(), []))
        .unwrap();

    assert_eq!(route.handler_name, "Normal");
    assert_eq!(route.action_name, "ActionWithoutParameters");
    assert!(route.route_values.is_empty());
}

#[test]
fn test_overload_selected_by_parameter_list() {
    let resolver = resolver();

    let with_id = resolver
        .resolve(&Invocation::<NormalHandler>::call(
            action_with_overloads_id(),
            [Expr::constant(1)],
        ))
        .unwrap();
    assert_eq!(with_id.action_name, "ActionWithOverloads");
    assert_eq!(with_id.route_values.len(), 1);
    assert_eq!(with_id.route_values.get("id"), Some(&json!(1)));

    let without_id = resolver
        .resolve(&Invocation::<NormalHandler>::call(action_with_overloads(), []))
        .unwrap();
    assert_eq!(without_id.action_name, "ActionWithOverloads");
    assert!(without_id.route_values.is_empty());

    assert_eq!(resolver.cache().stats().cached_targets, 2);
}

#[test]
fn test_multiple_parameters_with_complex_model() {
    let model = TestModel::sample();
    let route = resolver()
        .resolve(&Invocation::<NormalHandler>::call(
            action_with_multiple_parameters(),
            [
                Expr::constant(1),
                Expr::constant("string"),
                Expr::captured_serialize("model", model.clone()),
            ],
        ))
        .unwrap();

    assert_eq!(route.action_name, "ActionWithMultipleParameters");
    assert_eq!(route.route_values.len(), 3);
    assert_eq!(route.route_values.get("id"), Some(&json!(1)));
    assert_eq!(route.route_values.get("text"), Some(&json!("string")));
    assert_eq!(
        route.route_values.get("model"),
        Some(&serde_json::to_value(&model).unwrap())
    );
}

#[test]
fn test_captured_locals_and_computed_arguments() {
    let base = 40;
    let route = resolver()
        .resolve(&Invocation::<NormalHandler>::call(
            action_with_multiple_parameters(),
            [
                Expr::binary(
                    route_expressions::BinaryOp::Add,
                    Expr::captured("base", base),
                    Expr::constant(2),
                ),
                Expr::captured("settings", json!({"title": "Report"})).member("title"),
                Expr::null(),
            ],
        ))
        .unwrap();

    assert_eq!(route.route_values.get("id"), Some(&json!(42)));
    assert_eq!(route.route_values.get("text"), Some(&json!("Report")));
    assert!(!route.route_values.contains_key("model"));
}

#[test]
fn test_renamed_action() {
    let route = resolver()
        .resolve(&Invocation::<NormalHandler>::call(action_with_changed_name(), []))
        .unwrap();

    assert_eq!(route.handler_name, "Normal");
    assert_eq!(route.action_name, "AnotherName");
}

#[test]
fn test_unregistered_action_resolves_after_registration() {
    let provider = normal_provider();
    let resolver = ExpressionRouteResolver::new(provider.clone());
    let invocation = Invocation::<NormalHandler>::call(unregistered_action(), []);

    match resolver.resolve(&invocation) {
        Err(ResolveError::DispatchTargetNotFound { method }) => {
            assert_eq!(method, unregistered_action());
        }
        other => panic!("expected DispatchTargetNotFound, got {other:?}"),
    }

    provider.register(DispatchTarget::for_method::<NormalHandler>(unregistered_action()).build());

    let route = resolver.resolve(&invocation).unwrap();
    assert_eq!(route.action_name, "UnregisteredAction");
}

#[test]
fn test_binding_override() {
    let show = MethodIdentity::of::<NormalHandler>("Show", [ParameterInfo::of::<i32>("id")]);
    let provider = Arc::new(InMemoryDescriptorProvider::with_targets([
        DispatchTarget::for_method::<NormalHandler>(show.clone())
            .bind_parameter("id", "recordId")
            .build(),
    ]));

    let route = ExpressionRouteResolver::new(provider)
        .resolve(&Invocation::<NormalHandler>::call(show, [Expr::constant(9)]))
        .unwrap();

    assert_eq!(route.route_values.get("recordId"), Some(&json!(9)));
    assert!(!route.route_values.contains_key("id"));
}

#[test]
fn test_binding_override_uses_registered_parameter_names() {
    let registered = MethodIdentity::of::<NormalHandler>("Show", [ParameterInfo::of::<i32>("id")]);
    let provider = Arc::new(InMemoryDescriptorProvider::with_targets([
        DispatchTarget::for_method::<NormalHandler>(registered)
            .bind_parameter("id", "recordId")
            .build(),
    ]));

    let invoked =
        MethodIdentity::of::<NormalHandler>("Show", [ParameterInfo::of::<i32>("identifier")]);
    let route = ExpressionRouteResolver::new(provider)
        .resolve(&Invocation::<NormalHandler>::call(invoked, [Expr::constant(9)]))
        .unwrap();

    assert_eq!(route.route_values.get("recordId"), Some(&json!(9)));
    assert!(!route.route_values.contains_key("identifier"));
    assert_eq!(route.route_values.len(), 1);
}

#[test]
fn test_constraints_take_precedence_over_arguments() {
    let edit = MethodIdentity::of::<NormalHandler>(
        "Edit",
        [
            ParameterInfo::of::<String>("area"),
            ParameterInfo::of::<i32>("id"),
        ],
    );
    let provider = Arc::new(InMemoryDescriptorProvider::with_targets([
        DispatchTarget::for_method::<NormalHandler>(edit.clone())
            .constraint("area", "admin")
            .constraint("controller", "Administration")
            .build(),
    ]));

    let route = ExpressionRouteResolver::new(provider)
        .resolve(&Invocation::<NormalHandler>::call(
            edit,
            [Expr::constant("public"), Expr::constant(5)],
        ))
        .unwrap();

    assert_eq!(route.handler_name, "Administration");
    assert_eq!(route.route_values.get("area"), Some(&json!("admin")));
    assert_eq!(route.route_values.get("id"), Some(&json!(5)));

    let dictionary = route.to_route_dictionary();
    assert_eq!(dictionary.get("controller"), Some(&json!("Administration")));
    assert_eq!(dictionary.get("action"), Some(&json!("Edit")));
}

#[test]
fn test_default_policy_from_config() {
    let list = MethodIdentity::of::<NormalHandler>("List", []);
    let target = || {
        DispatchTarget::for_method::<NormalHandler>(list.clone())
            .default_value("area", json!("catalog"))
            .default_value("page", json!(1))
            .build()
    };
    let invocation = Invocation::<NormalHandler>::call(list.clone(), []);

    let all = ExpressionRouteResolver::new(Arc::new(InMemoryDescriptorProvider::with_targets([
        target(),
    ])))
    .resolve(&invocation)
    .unwrap();
    assert_eq!(all.route_values.len(), 2);

    let area_only = ExpressionRouteResolver::from_config(
        Arc::new(InMemoryDescriptorProvider::with_targets([target()])),
        &ResolverConfig {
            default_value_policy: DefaultValuePolicy::AreaOnly,
            ..ResolverConfig::default()
        },
    )
    .resolve(&invocation)
    .unwrap();
    assert_eq!(area_only.route_values.len(), 1);
    assert_eq!(area_only.route_values.get("area"), Some(&json!("catalog")));
}

#[test]
fn test_static_invocation_is_rejected() {
    let result = resolver().resolve(&Invocation::<NormalHandler>::new(Expr::static_call(
        action_without_parameters(),
        [],
    )));

    assert!(matches!(
        result,
        Err(ResolveError::StaticInvocationNotSupported { .. })
    ));
}

#[test]
fn test_non_call_body_is_rejected() {
    let result = resolver().resolve(&Invocation::<NormalHandler>::new(Expr::constant(1)));

    assert!(matches!(
        result,
        Err(ResolveError::InvalidExpressionShape { .. })
    ));
}

#[test]
fn test_evaluation_error_surfaces_unchanged() {
    let result = resolver().resolve(&Invocation::<NormalHandler>::call(
        action_with_overloads_id(),
        [Expr::binary(
            route_expressions::BinaryOp::Div,
            Expr::constant(1),
            Expr::constant(0),
        )],
    ));

    assert!(matches!(
        result,
        Err(ResolveError::Evaluation(EvaluationError::DivideByZero { .. }))
    ));
}

#[test]
fn test_other_handler_methods_do_not_match() {
    struct OtherController;
    impl RouteHandler for OtherController {}

    let method = MethodIdentity::of::<OtherController>("ActionWithoutParameters", []);
    let result = resolver().resolve(&Invocation::<OtherController>::call(method, []));

    assert!(matches!(
        result,
        Err(ResolveError::DispatchTargetNotFound { .. })
    ));
}
