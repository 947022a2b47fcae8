//! Defines constant NamedNodeRefs for commonly used RDF terms and predicates,
//! primarily from the RDF, RDFS, and OWL vocabularies.

use oxigraph::model::NamedNodeRef;

// rdf
pub const TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
pub const FIRST: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#first");
// rdfs
pub const SUB_CLASS_OF: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#subClassOf");
pub const SUB_PROPERTY_OF: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#subPropertyOf");
pub const DOMAIN: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#domain");
pub const RANGE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#range");
// owl
pub const ONTOLOGY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");
pub const IMPORTS: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#imports");
pub const ANNOTATION_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AnnotationProperty");
pub const NAMED_INDIVIDUAL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#NamedIndividual");
pub const EQUIVALENT_CLASS: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentClass");
pub const INVERSE_OF: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#inverseOf");
pub const ON_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#onProperty");
pub const SOME_VALUES_FROM: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#someValuesFrom");
pub const ALL_VALUES_FROM: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#allValuesFrom");

/// Predicates whose named-node objects pull further terms into an extracted
/// module (the upward structural closure of a seed set).
pub const MODULE_LINK_PREDICATES: [NamedNodeRef<'_>; 10] = [
    SUB_CLASS_OF,
    SUB_PROPERTY_OF,
    EQUIVALENT_CLASS,
    DOMAIN,
    RANGE,
    INVERSE_OF,
    ON_PROPERTY,
    SOME_VALUES_FROM,
    ALL_VALUES_FROM,
    FIRST,
];
