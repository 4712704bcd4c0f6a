//! Built-in curriculum used to pre-populate new templates.

use crate::id::UserId;
use crate::subject::Subject;
use crate::template::{Template, TemplateMetadata};
use crate::term::Term;

fn subject(id: &str, name: &str, category: &str, term: Term, prerequisites: &[&str]) -> Subject {
    Subject::new(id, name, category, term).with_prerequisites(prerequisites.iter().copied())
}

/// Ten-term systems engineering program with two intermediate terms.
pub fn default_template(owner: impl Into<UserId>) -> Template {
    let t = Term::ordinal;
    let mini = |repr: &str, value: f64| Term::from_parts(repr, value);

    let subjects = vec![
        subject("taller1", "Taller de tecnologías 1", "programming", t(1), &[]),
        subject("prog1", "Programación 1", "programming", t(1), &[]),
        subject("algebra", "Álgebra lineal", "math", t(1), &[]),
        subject("calculo", "Cálculo en una variable", "math", t(1), &[]),

        subject("fundcomp", "Fundamentos de computación", "programming", t(2), &[]),
        subject("prog2", "Programación 2", "programming", t(2), &["prog1"]),
        subject("matdisc", "Matemática discreta", "math", t(2), &[]),
        subject("fundsist", "Fundamentos de sistemas ciberfísicos", "systems", t(2), &["calculo"]),

        subject("logica", "Lógica para computación", "math", t(3), &["fundcomp"]),
        subject("algo1", "Estructuras de datos y algoritmos 1", "programming", t(3), &["prog2", "fundcomp"]),
        subject("arquit", "Arquitectura de sistemas", "systems", t(3), &[]),
        subject("probest", "Probabilidad y estadística", "math", t(3), &["algebra", "calculo"]),

        subject("fundsoft", "Fundamentos de ingeniería de software", "software", t(4), &["prog2"]),
        subject("algo2", "Estructuras de datos y algoritmos 2", "programming", t(4), &["algo1", "matdisc"]),
        subject("bd1", "Bases de datos 1", "data", t(4), &["prog2"]),
        subject("siso", "Sistemas operativos", "systems", t(4), &["arquit"]),
        subject("matmat", "Materia de Matemática", "math", t(4), &["algebra", "calculo"]),

        subject("teoria", "Teoría de la computación", "math", t(5), &["algo1", "logica"]),
        subject("app1", "Diseño de aplicaciones 1", "software", t(5), &["algo1", "bd1", "fundsoft"]),
        subject("bd2", "Bases de datos 2", "data", t(5), &["bd1", "logica"]),
        subject("redes", "Redes", "systems", t(5), &["siso"]),
        subject("matsocial", "Materia de Ciencias sociales", "management", t(5), &[]),

        subject("comun1", "Materia de Comunicación y negociación", "management", mini("5.5", 5.5), &[]),

        subject("agil1", "Ingeniería de software ágil 1", "software", t(6), &["app1", "fundsoft"]),
        subject("app2", "Diseño de aplicaciones 2", "software", t(6), &["app1", "fundsoft"]),
        subject(
            "taller2",
            "Taller de tecnologías 2",
            "programming",
            t(6),
            &["algo2", "bd1", "redes", "app1", "fundsist", "taller1"],
        ),
        subject("progredes", "Programación de redes", "systems", t(6), &["app1", "siso"]),
        subject("ml", "Materia de Sistemas inteligentes (Machine learning)", "data", t(6), &["algo1", "probest"]),

        subject("agil2", "Ingeniería de software ágil 2", "software", t(7), &["app1", "app2", "progredes", "agil1"]),
        subject("arquisoft", "Arquitectura de software", "software", t(7), &["algo2", "bd2", "app2", "progredes"]),
        subject("bigdata", "Materia de Gestión de la información (Big Data)", "data", t(7), &["bd2", "app1", "siso"]),
        subject("seguridad", "Materia de Seguridad informática", "systems", t(7), &[]),
        subject("ia", "Inteligencia artificial", "data", t(7), &["algo2", "probest", "logica"]),

        subject("innovacion", "Materia de Innovación y emprendedurismo", "management", mini("7.5", 7.5), &[]),

        subject("ingprod", "Materia de Ingeniería de productos de software", "software", t(8), &[]),
        subject(
            "arquipract",
            "Arquitectura de software en la práctica",
            "software",
            t(8),
            &["ml", "arquisoft", "progredes", "agil2"],
        ),
        subject("nuevastech", "Materia de nuevas tecnologías y dominios de aplicación", "programming", t(8), &[]),
        subject(
            "integrador",
            "Trabajo integrador",
            "software",
            t(8),
            &["bd2", "app2", "teoria", "progredes", "agil1"],
        ),
        subject("estructuras", "Materia de Algoritmos, Estructuras de datos y Lenguajes", "programming", t(8), &["algo2"]),

        subject("comun2", "Materia de Comunicación y negociación", "management", t(9), &[]),
        subject("elect1", "Electiva 1", "elective", t(9), &[]),

        subject("elect2", "Electiva 2", "elective", t(10), &[]),
        subject("elect3", "Electiva 3", "elective", t(10), &[]),
        subject(
            "proyectofinal",
            "Proyecto final",
            "software",
            t(10),
            &["bigdata", "seguridad", "innovacion", "ml", "integrador", "arquisoft", "ia", "agil2", "taller2"],
        ),
    ];

    let mut template = Template::new(
        owner,
        TemplateMetadata {
            institution: "Universidad ORT Uruguay".to_string(),
            program: "Ingeniería en Sistemas".to_string(),
            region: "Uruguay".to_string(),
            term_count: 10,
            intermediate_terms: vec![mini("5.5", 5.5), mini("7.5", 7.5)],
            palette: "purpor".to_string(),
        },
    );
    template.categories = ["programming", "math", "systems", "software", "data", "management", "elective"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    template.subjects = subjects;
    template
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate;

    #[test]
    fn test_default_template_is_valid() {
        let template = default_template("user-1");
        assert_eq!(template.subjects.len(), 44);
        assert_eq!(validate(&template), Ok(()));
    }

    #[test]
    fn test_default_categories_cover_every_subject() {
        let template = default_template("user-1");
        for subject in &template.subjects {
            assert!(template.categories.contains(&subject.category), "{}", subject.id);
        }
    }

    #[test]
    fn test_default_intermediate_terms() {
        let template = default_template("user-1");
        let intermediate: Vec<_> = template
            .subjects
            .iter()
            .filter(|s| s.term.is_intermediate())
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(intermediate, vec!["comun1", "innovacion"]);
        assert_eq!(template.available_terms().len(), 12);
    }
}
