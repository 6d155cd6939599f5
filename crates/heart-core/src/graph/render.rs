//! Rendered-text view: the source text with entity spans marked up.

use quick_xml::escape::escape;

use crate::models::{attr, Entity};

use super::AnnotationGraph;

impl AnnotationGraph {
    /// Render the source text inside `<div class="ner-doc">`, wrapping every
    /// entity span in `<span id="T{id}" class="...">`.
    ///
    /// Spans are character offsets. Sentinel entities and spans that fall
    /// outside the text are skipped. The trailing character of the text
    /// (the file's final newline) is not rendered.
    pub fn render_html(&self) -> String {
        let chars: Vec<char> = self.text.chars().collect();
        let mut ordered: Vec<&Entity> = self
            .entities
            .iter()
            .filter(|e| !e.id.is_sentinel() && !e.span.is_sentinel())
            .collect();
        ordered.sort_by_key(|e| e.span.start);

        let mut out = String::from(r#"<div class="ner-doc">"#);
        let mut cursor = 0usize;
        for entity in ordered {
            let (start, end) = (entity.span.start as usize, entity.span.end as usize);
            if start > end || end > chars.len() {
                tracing::debug!(entity = %entity.id, "span outside source text, not rendered");
                continue;
            }
            if cursor < start {
                push_text(&mut out, &chars[cursor..start]);
            }
            out.push_str(&format!(
                r#"<span id="T{}" class="{}">"#,
                entity.id,
                escape(self.span_class(entity).as_str())
            ));
            out.push_str(&escape(entity.text.as_str()));
            out.push_str("</span>");
            cursor = end;
        }
        if cursor + 1 < chars.len() {
            push_text(&mut out, &chars[cursor..chars.len() - 1]);
        }
        out.push_str("</div>");
        out.replace('\n', "<br>")
    }

    fn span_class(&self, entity: &Entity) -> String {
        let base = entity.tag.html_class();
        match self
            .attribute(entity.id, attr::CERTAINTY)
            .or_else(|| self.attribute(entity.id, attr::STATE))
        {
            Some(modality) => format!("{base}-{modality}"),
            None => base.to_string(),
        }
    }
}

fn push_text(out: &mut String, chars: &[char]) {
    let text: String = chars.iter().collect();
    out.push_str(&escape(text.as_str()));
}

#[cfg(test)]
mod tests {
    use crate::models::{Entity, EntityId, Span, Tag};

    use super::*;

    #[test]
    fn spans_are_wrapped_with_modality_class() {
        let mut graph = AnnotationGraph::new("a <b> fever\n");
        graph
            .add_entity(Entity::new(1, Tag::Disease, Span::new(6, 11), "fever"))
            .unwrap();
        graph.add_entity(Entity::dct()).unwrap();
        graph.set_attribute(EntityId(1), attr::CERTAINTY, "negative").unwrap();

        let html = graph.render_html();
        assert_eq!(
            html,
            r#"<div class="ner-doc">a &lt;b&gt; <span id="T1" class="disease-negative">fever</span></div>"#
        );
    }

    #[test]
    fn newlines_become_line_breaks() {
        let mut graph = AnnotationGraph::new("x\ny\nz!");
        graph
            .add_entity(Entity::new(3, Tag::Remedy, Span::new(0, 1), "x"))
            .unwrap();
        let html = graph.render_html();
        assert_eq!(
            html,
            r#"<div class="ner-doc"><span id="T3" class="remedy">x</span><br>y<br>z</div>"#
        );
    }
}
