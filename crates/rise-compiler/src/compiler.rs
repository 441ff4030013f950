use rise_config::{AppConfig, Definition, Operation, ResolverDef, StepDef};
use rise_pipeline::{CompiledApi, CompiledField, Dependency, Handles, ResolverKind};
use tracing::{debug, info, instrument};

use crate::assembler::Assembler;
use crate::emitter::{pipeline_resolver, unit_resolver};
use crate::error::{CompileError, FieldError};
use crate::templates::Templates;

/// Compiler transforms a Definition into a CompiledApi.
pub trait Compiler: Send + Sync {
  /// Compile every resolver in the definition.
  ///
  /// The first invalid field aborts the compile; its error names the
  /// operation and field.
  fn compile(&self, def: &Definition) -> Result<CompiledApi, CompileError>;
}

/// Standard compiler using the built-in templates.
pub struct StandardCompiler {
  handles: Handles,
  templates: Templates,
}

impl StandardCompiler {
  pub fn new(handles: Handles) -> Result<Self, CompileError> {
    let templates = Templates::new().map_err(CompileError::Templates)?;
    Ok(Self { handles, templates })
  }

  #[instrument(skip(self, def, app))]
  fn compile_field(
    &self,
    operation: Operation,
    field: &str,
    def: &ResolverDef,
    app: &AppConfig,
  ) -> Result<CompiledField, FieldError> {
    let schema = Dependency::schema(&self.handles.schema);
    let store = Dependency::data_source(&self.handles.store);

    match def {
      ResolverDef::Single(StepDef::Db(db)) => {
        let templates = unit_resolver(&self.templates, db)?;
        Ok(CompiledField {
          operation,
          field: field.to_string(),
          resolver: ResolverKind::Unit {
            data_source: self.handles.store.name().to_string(),
          },
          request_template: templates.request,
          response_template: templates.response,
          depends_on: vec![store, schema],
        })
      }
      ResolverDef::Single(other) => Err(FieldError::UnsupportedSingleStep { tag: other.tag() }),
      ResolverDef::Pipeline(descriptors) => {
        let pipeline =
          Assembler::new(&self.templates, &self.handles, app).assemble(operation, field, descriptors)?;
        let templates = pipeline_resolver(&self.templates, &pipeline)?;

        let mut depends_on = pipeline.step_dependencies();
        depends_on.push(store);
        depends_on.push(schema);

        debug!(steps = pipeline.len(), "pipeline assembled");
        Ok(CompiledField {
          operation,
          field: field.to_string(),
          resolver: ResolverKind::Pipeline(pipeline),
          request_template: templates.request,
          response_template: templates.response,
          depends_on,
        })
      }
    }
  }
}

impl Compiler for StandardCompiler {
  #[instrument(skip(self, def), fields(app = %def.config.name))]
  fn compile(&self, def: &Definition) -> Result<CompiledApi, CompileError> {
    let app = &def.config;
    let mut fields = Vec::with_capacity(def.resolvers.len());

    for (operation, field, resolver) in def.resolvers.iter() {
      let compiled = self
        .compile_field(operation, field, resolver, app)
        .map_err(|source| CompileError::field(operation, field, source))?;
      info!(
        %operation,
        field,
        pipeline = resolver.is_pipeline(),
        steps = compiled.functions().len(),
        "field compiled"
      );
      fields.push(compiled);
    }

    debug!(fields = fields.len(), "definition compiled");

    Ok(CompiledApi {
      name: app.name.clone(),
      region: app.region().to_string(),
      table_name: app.table_name(),
      event_bus: app.event_bus().to_string(),
      schema: def.schema.clone(),
      fields,
    })
  }
}
