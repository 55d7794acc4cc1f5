use crate::{
    config::FinalizeConfig,
    convention::*,
    error::{ErrorClass, InternalError},
    mapping::{TypeMappingSource, provider::sql_server},
    model::ModelBuilder,
};
use relmap_primitives::{ValueKind, ValueType};
use std::sync::Arc;

fn apply(
    convention: &dyn Convention,
    builder: &mut ModelBuilder,
    source: &dyn TypeMappingSource,
) -> Result<(), InternalError> {
    let config = FinalizeConfig::default();
    let mut context = ConventionContext::new(source, &config, 1);

    convention.apply(builder, &mut context)
}

struct Named {
    name: &'static str,
    stage: ConventionStage,
    after: &'static [&'static str],
}

impl Convention for Named {
    fn name(&self) -> &'static str {
        self.name
    }

    fn stage(&self) -> ConventionStage {
        self.stage
    }

    fn runs_after(&self) -> &'static [&'static str] {
        self.after
    }

    fn apply(
        &self,
        _builder: &mut ModelBuilder,
        _context: &mut ConventionContext<'_>,
    ) -> Result<(), InternalError> {
        Ok(())
    }
}

const fn named(
    name: &'static str,
    stage: ConventionStage,
    after: &'static [&'static str],
) -> Named {
    Named { name, stage, after }
}

fn order(set: &ConventionSet) -> Vec<&'static str> {
    set.ordered()
        .expect("ordered")
        .into_iter()
        .map(|c| c.name())
        .collect()
}

//
// ConventionSet
//

#[test]
fn defaults_run_in_stage_order() {
    assert_eq!(
        order(&ConventionSet::defaults()),
        [
            "key_discovery",
            "key_nullability",
            "foreign_key_index",
            "property_type_mapping",
            "db_function_type_mapping",
            "model_validation",
        ]
    );
}

#[test]
fn stage_outranks_registration_order() {
    let mut set = ConventionSet::new();
    set.register(named("check", ConventionStage::Validation, &[]))
        .expect("register");
    set.register(named("map", ConventionStage::TypeMapping, &[]))
        .expect("register");
    set.register(named("shape", ConventionStage::Shape, &[]))
        .expect("register");

    assert_eq!(order(&set), ["shape", "map", "check"]);
}

#[test]
fn runs_after_reorders_within_a_stage() {
    let mut set = ConventionSet::new();
    set.register(named("b", ConventionStage::Shape, &["c"]))
        .expect("register");
    set.register(named("a", ConventionStage::Shape, &[]))
        .expect("register");
    set.register(named("c", ConventionStage::Shape, &[]))
        .expect("register");

    assert_eq!(order(&set), ["a", "c", "b"]);
}

#[test]
fn invalid_registrations_are_rejected() {
    let mut set = ConventionSet::new();
    set.register(named("a", ConventionStage::Shape, &[]))
        .expect("register");
    assert!(matches!(
        set.register(named("a", ConventionStage::Shape, &[])),
        Err(ConventionSetError::DuplicateName("a"))
    ));

    let mut unknown = ConventionSet::new();
    unknown
        .register(named("a", ConventionStage::Shape, &["missing"]))
        .expect("register");
    assert!(matches!(
        unknown.ordered(),
        Err(ConventionSetError::UnknownDependency { .. })
    ));

    let mut inverted = ConventionSet::new();
    inverted
        .register(named("early", ConventionStage::Shape, &["late"]))
        .expect("register");
    inverted
        .register(named("late", ConventionStage::Validation, &[]))
        .expect("register");
    assert!(matches!(
        inverted.ordered(),
        Err(ConventionSetError::StageInversion { .. })
    ));

    let mut cyclic = ConventionSet::new();
    cyclic
        .register(named("x", ConventionStage::Shape, &["y"]))
        .expect("register");
    cyclic
        .register(named("y", ConventionStage::Shape, &["x"]))
        .expect("register");
    let err = cyclic.ordered().map(|_| ()).expect_err("cycle");
    assert!(matches!(err, ConventionSetError::Cycle(_)));
    assert_eq!(
        InternalError::from(err).class,
        ErrorClass::InvalidArgument
    );
}

#[test]
fn removed_conventions_do_not_run() {
    let mut set = ConventionSet::defaults();

    assert!(set.remove(ForeignKeyIndexConvention::NAME));
    assert!(!set.remove(ForeignKeyIndexConvention::NAME));
    assert_eq!(set.len(), 5);
    assert!(!order(&set).contains(&ForeignKeyIndexConvention::NAME));
}

//
// Shape conventions
//

#[test]
fn key_discovery_matches_id_and_typed_id() {
    let source = sql_server::mapping_source();
    let mut builder = ModelBuilder::new();
    let blog = builder.add_entity_type("Blog").expect("entity");
    let post = builder.add_entity_type("Post").expect("entity");
    let tag = builder.add_entity_type("Tag").expect("entity");
    let area = builder.add_entity_type("Area").expect("entity");

    builder
        .add_property(blog, "ID", ValueType::required(ValueKind::Int))
        .expect("property");
    builder
        .add_property(post, "PostId", ValueType::required(ValueKind::Guid))
        .expect("property");
    // ambiguous
    builder
        .add_property(tag, "Id", ValueType::required(ValueKind::Int))
        .expect("property");
    builder
        .add_property(tag, "TagId", ValueType::required(ValueKind::Int))
        .expect("property");
    // not keyable
    builder
        .add_property(area, "Id", ValueType::required(ValueKind::Geometry))
        .expect("property");

    apply(&KeyDiscoveryConvention, &mut builder, &source).expect("apply");

    let has_pk = |id| {
        builder
            .entity_type(id)
            .and_then(|e| e.primary_key())
            .is_some()
    };
    assert!(has_pk(blog));
    assert!(has_pk(post));
    assert!(!has_pk(tag));
    assert!(!has_pk(area));
}

#[test]
fn key_nullability_respects_explicit_configuration() {
    let source = sql_server::mapping_source();
    let mut builder = ModelBuilder::new();
    let blog = builder.add_entity_type("Blog").expect("entity");
    let id = builder
        .add_property(blog, "Id", ValueType::optional(ValueKind::Int))
        .expect("property");
    let code = builder
        .add_property(blog, "Code", ValueType::optional(ValueKind::Text))
        .expect("property");
    builder.set_primary_key(blog, &[id]).expect("pk");
    builder.add_key(blog, &[code]).expect("key");
    builder.set_nullable(code, true).expect("explicit");

    apply(&KeyNullabilityConvention, &mut builder, &source).expect("apply");

    assert!(!builder.property_node(id).expect("id").is_nullable());
    assert!(builder.property_node(code).expect("code").is_nullable());
}

#[test]
fn foreign_key_index_skips_covered_foreign_keys() {
    let source = sql_server::mapping_source();
    let mut builder = ModelBuilder::new();
    let blog = builder.add_entity_type("Blog").expect("entity");
    let post = builder.add_entity_type("Post").expect("entity");
    let blog_id = builder
        .add_property(blog, "Id", ValueType::required(ValueKind::Int))
        .expect("property");
    let post_blog = builder
        .add_property(post, "BlogId", ValueType::required(ValueKind::Int))
        .expect("property");
    let post_no = builder
        .add_property(post, "No", ValueType::required(ValueKind::Int))
        .expect("property");
    let author = builder
        .add_property(post, "AuthorId", ValueType::required(ValueKind::Int))
        .expect("property");

    let blog_pk = builder.set_primary_key(blog, &[blog_id]).expect("pk");
    builder
        .set_primary_key(post, &[post_blog, post_no])
        .expect("pk");
    builder
        .add_foreign_key(post, &[post_blog], blog_pk)
        .expect("fk");
    builder
        .add_foreign_key(post, &[author], blog_pk)
        .expect("fk");

    apply(&ForeignKeyIndexConvention, &mut builder, &source).expect("apply");

    // BlogId is a primary key prefix; only AuthorId needs an index
    let indexed: Vec<_> = builder
        .indexes()
        .map(|(_, ix)| builder.format_property_ids(ix.properties(), false))
        .collect();
    assert_eq!(indexed, ["{'AuthorId'}"]);

    let version = builder.structure_version();
    apply(&ForeignKeyIndexConvention, &mut builder, &source).expect("apply");
    assert_eq!(builder.structure_version(), version);
}

//
// Type mapping conventions
//

fn spatial_functions(builder: &mut ModelBuilder) -> crate::metadata::FunctionId {
    let f = builder
        .add_function("Distance", ValueKind::Double)
        .expect("fn");
    builder
        .add_function_parameter(f, "amount", ValueKind::Double)
        .expect("param");
    builder
        .add_function_parameter(f, "area", ValueKind::Geometry)
        .expect("param");
    builder
        .set_parameter_store_type(f, "amount", Some("decimal(10,2)"))
        .expect("store type");

    f
}

#[test]
fn db_function_mapping_prefers_explicit_store_types() {
    let source = sql_server::mapping_source();
    let mut builder = ModelBuilder::new();
    let f = spatial_functions(&mut builder);

    apply(&DbFunctionTypeMappingConvention, &mut builder, &source).expect("apply");

    let function = builder.function(f).expect("fn");
    let amount = function
        .parameter("amount")
        .and_then(|p| p.type_mapping())
        .expect("amount");
    let by_name = source
        .find_mapping_by_store_type("decimal(10,2)")
        .expect("decimal");
    let by_kind = source
        .find_mapping_by_kind(ValueKind::Double)
        .expect("float");

    assert!(Arc::ptr_eq(amount, &by_name));
    assert!(!Arc::ptr_eq(amount, &by_kind));
    assert_eq!(amount.store_type, "decimal(10,2)");

    let area = function
        .parameter("area")
        .and_then(|p| p.type_mapping())
        .expect("area");
    assert_eq!(area.store_type, "geography");
    assert_eq!(
        function.type_mapping().map(|m| m.store_type.as_str()),
        Some("float")
    );
}

#[test]
fn db_function_mapping_is_idempotent() {
    let source = sql_server::mapping_source();
    let mut builder = ModelBuilder::new();
    let f = spatial_functions(&mut builder);

    apply(&DbFunctionTypeMappingConvention, &mut builder, &source).expect("apply");
    let first: Vec<_> = builder
        .function(f)
        .expect("fn")
        .parameters()
        .iter()
        .map(|p| p.type_mapping().cloned())
        .collect();

    apply(&DbFunctionTypeMappingConvention, &mut builder, &source).expect("apply");
    let second: Vec<_> = builder
        .function(f)
        .expect("fn")
        .parameters()
        .iter()
        .map(|p| p.type_mapping().cloned())
        .collect();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        let (a, b) = (a.as_ref().expect("a"), b.as_ref().expect("b"));
        assert!(Arc::ptr_eq(a, b));
    }
}

#[test]
fn db_function_mapping_assigns_absent_without_failing() {
    let source = sql_server::mapping_source();
    let mut builder = ModelBuilder::new();
    let f = builder.add_function("Lookup", ValueKind::Int).expect("fn");
    builder
        .set_function_store_type(f, Some("hierarchyid"))
        .expect("store type");

    apply(&DbFunctionTypeMappingConvention, &mut builder, &source).expect("apply");

    assert!(builder.function(f).expect("fn").type_mapping().is_none());
}

#[test]
fn property_mapping_honours_facets_and_converters() {
    let source = sql_server::mapping_source();
    let mut builder = ModelBuilder::new();
    let blog = builder.add_entity_type("Blog").expect("entity");
    let title = builder
        .add_property(blog, "Title", ValueType::required(ValueKind::Text))
        .expect("property");
    let flag = builder
        .add_property(blog, "Flag", ValueType::required(ValueKind::Bool))
        .expect("property");
    let score = builder
        .add_property(blog, "Score", ValueType::required(ValueKind::Double))
        .expect("property");

    builder.set_max_length(title, Some(120)).expect("length");
    builder.set_unicode(title, Some(false)).expect("unicode");
    builder
        .set_value_converter(flag, Some(crate::mapping::ValueConverter::bool_to_int()))
        .expect("converter");
    builder
        .set_store_type(score, Some("decimal(10,2)"))
        .expect("store type");

    apply(&PropertyTypeMappingConvention, &mut builder, &source).expect("apply");

    let store_type = |id| {
        builder
            .property(id)
            .and_then(|p| p.find_type_mapping())
            .map(|m| m.store_type.clone())
    };
    assert_eq!(store_type(title).as_deref(), Some("varchar(120)"));
    assert_eq!(store_type(flag).as_deref(), Some("int"));
    assert_eq!(store_type(score).as_deref(), Some("decimal(10,2)"));
}

//
// Validation
//

#[test]
fn validation_reports_mismatched_foreign_key_kinds_with_types() {
    let source = sql_server::mapping_source();
    let mut builder = ModelBuilder::new();
    let blog = builder.add_entity_type("Blog").expect("entity");
    let post = builder.add_entity_type("Post").expect("entity");
    let blog_id = builder
        .add_property(blog, "Id", ValueType::required(ValueKind::Int))
        .expect("property");
    let post_id = builder
        .add_property(post, "Id", ValueType::required(ValueKind::Int))
        .expect("property");
    let post_blog = builder
        .add_property(post, "BlogId", ValueType::optional(ValueKind::Long))
        .expect("property");
    let blog_pk = builder.set_primary_key(blog, &[blog_id]).expect("pk");
    builder.set_primary_key(post, &[post_id]).expect("pk");
    builder
        .add_foreign_key(post, &[post_blog], blog_pk)
        .expect("fk");

    let err = apply(&ModelValidationConvention, &mut builder, &source).expect_err("mismatch");

    assert_eq!(err.class, ErrorClass::ModelValidation);
    assert_eq!(
        err.message,
        "the types of foreign key properties {'BlogId' : long?} on entity type 'Post' do not match the types of principal key properties {'Id' : int} on entity type 'Blog'"
    );
}

#[test]
fn validation_rejects_nullable_keys_and_missing_primary_keys() {
    let source = sql_server::mapping_source();
    let mut builder = ModelBuilder::new();
    let blog = builder.add_entity_type("Blog").expect("entity");
    let id = builder
        .add_property(blog, "Id", ValueType::optional(ValueKind::Int))
        .expect("property");

    let err = apply(&ModelValidationConvention, &mut builder, &source).expect_err("no pk");
    assert_eq!(err.message, "entity type 'Blog' requires a primary key");

    builder.set_primary_key(blog, &[id]).expect("pk");
    let err = apply(&ModelValidationConvention, &mut builder, &source).expect_err("nullable");
    assert_eq!(
        err.message,
        "primary key {'Id'} on entity type 'Blog' contains nullable properties {'Id' : int?}"
    );
}

#[test]
fn validation_rejects_unmapped_properties() {
    let source = sql_server::mapping_source();
    let mut builder = ModelBuilder::new();
    let blog = builder.add_entity_type("Blog").expect("entity");
    let id = builder
        .add_property(blog, "Id", ValueType::required(ValueKind::Int))
        .expect("property");
    let tree = builder
        .add_property(blog, "Path", ValueType::required(ValueKind::Text))
        .expect("property");
    builder.set_primary_key(blog, &[id]).expect("pk");
    builder
        .set_store_type(tree, Some("hierarchyid"))
        .expect("store type");

    apply(&PropertyTypeMappingConvention, &mut builder, &source).expect("map");
    let err = apply(&ModelValidationConvention, &mut builder, &source).expect_err("unmapped");

    assert_eq!(
        err.message,
        "property 'Blog.Path' of type string with store type 'hierarchyid' could not be mapped to a store type"
    );
}
