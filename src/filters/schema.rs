use indexmap::IndexMap;
use log::debug;

use crate::annotations::{AnnotationKind, Target};
use crate::error::DocsResult;
use crate::models::Schema;
use crate::{reconcile, requirement};

use super::{SchemaContext, SchemaFilter};

/// Removes suppressed members from the schema under every name they may
/// carry, in properties and in `required`
pub struct SuppressFilter;

impl SchemaFilter for SuppressFilter {
    fn name(&self) -> &'static str {
        "suppress"
    }

    fn apply(
        &self,
        schemas: &mut IndexMap<String, Schema>,
        ctx: &SchemaContext<'_>,
    ) -> DocsResult<()> {
        let schema = match schemas.get_mut(ctx.schema_id) {
            Some(schema) => schema,
            None => return Ok(()),
        };

        for member in ctx.members {
            if ctx
                .provider
                .annotations_of(Target::Member(member), AnnotationKind::Suppress)
                .is_empty()
            {
                continue;
            }

            let keys = reconcile::matching_keys(member, schema.properties.keys());
            for key in &keys {
                debug!("Suppressing {}.{}", ctx.schema_id, key);
                schema.properties.shift_remove(key);
            }
            schema.required.retain(|name| !keys.contains(name));
        }

        Ok(())
    }
}

pub struct ConditionalRequirementFilter;

impl SchemaFilter for ConditionalRequirementFilter {
    fn name(&self) -> &'static str {
        "conditional-requirement"
    }

    fn apply(
        &self,
        schemas: &mut IndexMap<String, Schema>,
        ctx: &SchemaContext<'_>,
    ) -> DocsResult<()> {
        let documented = requirement::document_conditional(schemas, ctx.schema_id, ctx.members)?;
        if documented > 0 {
            debug!("Documented {} conditional requirements on {}", documented, ctx.schema_id);
        }
        Ok(())
    }
}

pub struct OnEmptyRequirementFilter;

impl SchemaFilter for OnEmptyRequirementFilter {
    fn name(&self) -> &'static str {
        "on-empty-requirement"
    }

    fn apply(
        &self,
        schemas: &mut IndexMap<String, Schema>,
        ctx: &SchemaContext<'_>,
    ) -> DocsResult<()> {
        let documented = requirement::document_on_empty(schemas, ctx.schema_id, ctx.members)?;
        if documented > 0 {
            debug!("Documented {} on-empty requirements on {}", documented, ctx.schema_id);
        }
        Ok(())
    }
}
