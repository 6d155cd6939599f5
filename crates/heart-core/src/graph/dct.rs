//! Document-creation-time anchoring and timex normalization.

use crate::errors::HeartResult;
use crate::models::{attr, Entity, EntityId, RelationType, Tag, TimexType};
use crate::traits::ITimexNormalizer;

use super::AnnotationGraph;

impl AnnotationGraph {
    /// Materialize the DCT sentinel and turn every `DCT-Rel` attribute into a
    /// relation of that type pointing at it.
    ///
    /// Idempotent: the sentinel is inserted once and equal relations are not
    /// duplicated. Unknown `DCT-Rel` values are skipped.
    pub fn relate_dct(&mut self) -> HeartResult<usize> {
        if !self.contains(EntityId::DCT) {
            self.prepend_entity(Entity::dct())?;
            self.set_attribute(EntityId::DCT, attr::TIMEX_TYPE, TimexType::Date.as_str())?;
        }

        let anchored: Vec<(EntityId, RelationType)> = self
            .entities
            .iter()
            .filter(|e| e.id != EntityId::DCT)
            .filter_map(|e| {
                let raw = self.attribute(e.id, attr::DCT_REL)?;
                match RelationType::from_str_name(raw) {
                    Some(rel) if rel.is_temporal() => Some((e.id, rel)),
                    _ => {
                        tracing::debug!(entity = %e.id, value = raw, "ignoring unknown DCT-Rel value");
                        None
                    }
                }
            })
            .collect();

        let mut added = 0;
        for (id, rel) in anchored {
            if self.add_relation(rel, id, EntityId::DCT)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Write the normalized `value` attribute of every temporal expression.
    ///
    /// The DCT sentinel receives `dct` verbatim. Normalizer failures propagate
    /// unchanged and leave the remaining expressions untouched.
    pub fn normalize_timexes(
        &mut self,
        normalizer: &dyn ITimexNormalizer,
        dct: &str,
    ) -> HeartResult<()> {
        for id in self.ids_with_tag(Tag::Timex3) {
            let value = if id == EntityId::DCT {
                dct.to_string()
            } else {
                let entity = self.entity(id)?;
                let timex_type = self.attribute(id, attr::TIMEX_TYPE).unwrap_or("");
                normalizer.normalize(&entity.text, timex_type, dct)?
            };
            self.set_attribute(id, attr::VALUE, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{HeartError, TemporalError};
    use crate::models::Span;

    fn graph() -> AnnotationGraph {
        let mut graph = AnnotationGraph::new("");
        graph
            .add_entity(Entity::new(1, Tag::Disease, Span::new(0, 2), "cough"))
            .unwrap();
        graph
            .add_entity(Entity::new(2, Tag::Timex3, Span::new(3, 5), "today"))
            .unwrap();
        graph.set_attribute(EntityId(1), attr::DCT_REL, "before").unwrap();
        graph.set_attribute(EntityId(2), attr::TIMEX_TYPE, "DATE").unwrap();
        graph
    }

    #[test]
    fn dct_relation_is_materialized_once() {
        let mut graph = graph();
        assert_eq!(graph.relate_dct().unwrap(), 1);
        assert_eq!(graph.relate_dct().unwrap(), 0);
        assert_eq!(graph.ids()[0], EntityId::DCT);
        assert!(graph.has_edge(RelationType::Before, EntityId(1), EntityId::DCT));
        assert_eq!(graph.attribute(EntityId::DCT, attr::TIMEX_TYPE), Some("DATE"));
    }

    #[test]
    fn normalizer_receives_text_type_and_dct() {
        let mut graph = graph();
        graph.relate_dct().unwrap();
        let normalizer = |text: &str, ty: &str, dct: &str| -> HeartResult<String> {
            Ok(format!("{text}|{ty}|{dct}"))
        };
        graph.normalize_timexes(&normalizer, "2014-03-20").unwrap();
        assert_eq!(graph.attribute(EntityId::DCT, attr::VALUE), Some("2014-03-20"));
        assert_eq!(
            graph.attribute(EntityId(2), attr::VALUE),
            Some("today|DATE|2014-03-20")
        );
    }

    #[test]
    fn normalizer_failure_propagates() {
        let mut graph = graph();
        let normalizer = |_: &str, _: &str, _: &str| -> HeartResult<String> {
            Err(TemporalError::NormalizationFailed {
                id: EntityId(2),
                reason: "unparseable".into(),
            }
            .into())
        };
        let err = graph.normalize_timexes(&normalizer, "2014-03-20").unwrap_err();
        assert!(matches!(
            err,
            HeartError::TemporalError(TemporalError::NormalizationFailed { .. })
        ));
    }
}
